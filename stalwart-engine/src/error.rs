//! Errors that abort an analysis cycle.
//!
//! Noisy or incomplete field data never ends up here: estimators fall back to
//! documented constants and calculators degrade their confidence. These
//! variants only describe a misconfigured collaborator.

use stalwart_types::ThresholdError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The structure under analysis has no identifier.
    #[error("structure identifier is empty")]
    MissingStructureId,

    /// A reading arrived without naming the structure it belongs to.
    #[error("measurement from sensor {sensor_id:?} has no structure identifier")]
    UnattributedMeasurement { sensor_id: String },

    /// The threshold table violates its configuration invariant.
    #[error("invalid threshold configuration: {0}")]
    Thresholds(#[from] ThresholdError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
