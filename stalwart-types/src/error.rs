//! Error types for schema values.

use thiserror::Error;

use crate::Parameter;

/// A threshold specification violates its configuration invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    /// Boundaries are not strictly monotonic in the "badness" direction.
    #[error(
        "{parameter} thresholds must be {order} (warning={warning}, caution={caution}, critical={critical})"
    )]
    NonMonotonic {
        parameter: Parameter,
        order: &'static str,
        warning: f64,
        caution: f64,
        critical: f64,
    },

    /// The value range is empty or inverted.
    #[error("{parameter} range is invalid: min={min} must be below max={max}")]
    InvalidRange {
        parameter: Parameter,
        min: f64,
        max: f64,
    },
}

/// Failed to parse a schema value from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown parameter code: {0}")]
    UnknownParameter(String),
}
