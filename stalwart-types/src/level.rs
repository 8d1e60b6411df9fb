//! Status, risk and alert severity levels.

use core::fmt;

/// Per-metric status tag, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum MetricStatus {
    Safe,
    Warning,
    Caution,
    Critical,
}

impl MetricStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricStatus::Safe => "SAFE",
            MetricStatus::Warning => "WARNING",
            MetricStatus::Caution => "CAUTION",
            MetricStatus::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall risk level assigned to a structure for one analysis cycle.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum RiskLevel {
    /// No concerns.
    Safe,
    /// Normal variation, keep watching.
    Monitor,
    /// Potential issues, increase monitoring.
    Warning,
    /// Serious concerns, plan intervention.
    Caution,
    /// Immediate action required.
    Critical,
    /// Critical failure imminent.
    Emergency,
}

impl RiskLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Monitor => "MONITOR",
            RiskLevel::Warning => "WARNING",
            RiskLevel::Caution => "CAUTION",
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::Emergency => "EMERGENCY",
        }
    }

    /// Whether this level calls for intervention rather than observation.
    pub fn requires_action(&self) -> bool {
        *self >= RiskLevel::Caution
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a threshold-crossing alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum AlertLevel {
    Warning,
    Caution,
    Critical,
}

impl AlertLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Warning => "WARNING",
            AlertLevel::Caution => "CAUTION",
            AlertLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
