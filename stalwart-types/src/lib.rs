//! # stalwart-types
//!
//! Core types for bridge structural health assessment. This crate defines the
//! records exchanged between sensing collaborators, the scoring engine and
//! reporting consumers.
//!
//! ## Design Goals
//!
//! - **Closed parameter set**: the nine structural-condition parameters are a
//!   fixed enumeration, not strings
//! - **Explicit configuration**: thresholds are an immutable value passed in,
//!   never a process-wide default
//! - **Optional serialization**: enable the `serde` feature as needed
//!
//! ## Features
//!
//! - `serde`: JSON/TOML/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use stalwart_types::{MetricStatus, Parameter, ThresholdTable};
//!
//! let table = ThresholdTable::standard();
//! assert!(table.validate().is_ok());
//!
//! let bd = table.get(Parameter::Bd).unwrap();
//! assert_eq!(bd.classify(12.0), MetricStatus::Warning);
//!
//! // CPII is inverted: higher values are safer.
//! let cpii = table.get(Parameter::Cpii).unwrap();
//! assert_eq!(cpii.classify(0.95), MetricStatus::Safe);
//! ```

mod alert;
mod error;
mod level;
mod measurement;
mod metric;
mod parameter;
mod status;
mod threshold;

pub use alert::*;
pub use error::*;
pub use level::*;
pub use measurement::*;
pub use metric::*;
pub use parameter::*;
pub use status::*;
pub use threshold::*;

/// Get current timestamp in milliseconds since Unix epoch.
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
