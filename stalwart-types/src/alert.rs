//! Threshold-crossing alerts.

use crate::{AlertLevel, Parameter};

/// A boundary crossing detected for one parameter in one analysis cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    pub structure_id: String,
    pub timestamp_ms: u64,
    pub parameter: Parameter,
    pub value: f64,
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    /// Create an alert with the standard message, e.g. `"BD = 34.000 (CRITICAL)"`.
    pub fn new(
        structure_id: impl Into<String>,
        timestamp_ms: u64,
        parameter: Parameter,
        value: f64,
        level: AlertLevel,
    ) -> Self {
        Self {
            structure_id: structure_id.into(),
            timestamp_ms,
            parameter,
            value,
            level,
            message: format!("{} = {:.3} ({})", parameter, value, level),
        }
    }
}
