//! BridgeStatus - the per-cycle health snapshot of a structure.

use std::collections::BTreeMap;

use crate::{Alert, AlertLevel, Parameter, RiskLevel};

/// Health assessment of one structure for one analysis cycle.
///
/// Created once per cycle and never modified; the next cycle supersedes it
/// with a new value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeStatus {
    pub structure_id: String,

    /// Unix timestamp in milliseconds of the cycle.
    pub timestamp_ms: u64,

    /// Overall health percentage in `[0, 100]`.
    pub overall_health: f64,

    pub risk_level: RiskLevel,

    /// Computed value of each parameter present this cycle.
    pub parameters: BTreeMap<Parameter, f64>,

    /// Alerts raised this cycle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub alerts: Vec<Alert>,

    /// Remaining service life in months, when an external predictor supplies it.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub remaining_life_months: Option<f64>,
}

impl BridgeStatus {
    /// Value of a parameter, if it was computed this cycle.
    pub fn parameter(&self, parameter: Parameter) -> Option<f64> {
        self.parameters.get(&parameter).copied()
    }

    /// Most severe alert level raised this cycle.
    pub fn worst_alert(&self) -> Option<AlertLevel> {
        self.alerts.iter().map(|a| a.level).max()
    }

    /// Copy of this status carrying a remaining-life estimate.
    pub fn with_remaining_life(mut self, months: f64) -> Self {
        self.remaining_life_months = Some(months);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> BridgeStatus {
        let mut parameters = BTreeMap::new();
        parameters.insert(Parameter::Bd, 34.0);
        parameters.insert(Parameter::Ffd, -1.5);
        BridgeStatus {
            structure_id: "TEST-001".to_string(),
            timestamp_ms: 1_700_000_000_000,
            overall_health: 72.5,
            risk_level: RiskLevel::Monitor,
            parameters,
            alerts: vec![
                Alert::new("TEST-001", 0, Parameter::Bd, 34.0, AlertLevel::Critical),
                Alert::new("TEST-001", 0, Parameter::Sed, 55.0, AlertLevel::Warning),
            ],
            remaining_life_months: None,
        }
    }

    #[test]
    fn parameter_lookup() {
        let s = status();
        assert_eq!(s.parameter(Parameter::Bd), Some(34.0));
        assert_eq!(s.parameter(Parameter::Afc), None);
    }

    #[test]
    fn worst_alert() {
        assert_eq!(status().worst_alert(), Some(AlertLevel::Critical));
    }

    #[test]
    fn remaining_life() {
        let s = status().with_remaining_life(120.0);
        assert_eq!(s.remaining_life_months, Some(120.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let s = status();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"BD\":34.0"));
        assert!(!json.contains("remaining_life_months"));
        let parsed: BridgeStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(s, parsed);
    }
}
