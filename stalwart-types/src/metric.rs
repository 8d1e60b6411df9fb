//! Result of a single metric calculation.

use std::collections::BTreeMap;

use crate::MetricStatus;

/// Outcome of one metric calculator for one analysis cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricResult {
    pub value: f64,

    /// Status tag, or `None` when no threshold spec is configured for the
    /// parameter and the value cannot be classified.
    pub status: Option<MetricStatus>,

    /// Confidence in `[0, 1]`.
    pub confidence: f64,

    /// Intermediate quantities that explain the value.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub details: BTreeMap<String, f64>,
}

impl MetricResult {
    pub fn new(value: f64, status: Option<MetricStatus>, confidence: f64) -> Self {
        Self {
            value,
            status,
            confidence: confidence.clamp(0.0, 1.0),
            details: BTreeMap::new(),
        }
    }

    /// Attach an explanatory detail.
    pub fn detail(mut self, key: impl Into<String>, value: f64) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Cap the confidence, for results computed from substituted inputs.
    pub fn cap_confidence(mut self, max: f64) -> Self {
        self.confidence = self.confidence.min(max.clamp(0.0, 1.0));
        self
    }

    pub fn is(&self, status: MetricStatus) -> bool {
        self.status == Some(status)
    }
}
