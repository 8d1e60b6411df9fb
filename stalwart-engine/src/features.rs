//! Feature vectors for external remaining-life predictors.

use stalwart_types::{BridgeStatus, Parameter};

use crate::specs::BridgeSpecs;

/// Length of every feature vector.
pub const FEATURE_COUNT: usize = 3 + Parameter::ALL.len();

/// Column names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "span_length", "year_built", "daily_traffic", "AFC", "ALSA", "CPII", "FFD", "LTS", "CCF",
    "TVR", "BD", "SED",
];

/// Normalized design data followed by the nine parameter values in
/// canonical order. Parameters absent from the status, or all of them
/// without a status, read 0.0.
pub fn feature_vector(specs: &BridgeSpecs, status: Option<&BridgeStatus>) -> Vec<f64> {
    let mut features = Vec::with_capacity(FEATURE_COUNT);
    features.push(specs.span_length / 1000.0);
    features.push(f64::from(specs.year_built) / 2000.0);
    features.push(f64::from(specs.daily_traffic) / 100_000.0);
    features.extend(
        Parameter::ALL
            .iter()
            .map(|p| status.and_then(|s| s.parameter(*p)).unwrap_or(0.0)),
    );
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::BridgeType;
    use stalwart_types::RiskLevel;
    use std::collections::BTreeMap;

    #[test]
    fn normalizes_specs_and_orders_parameters() {
        let specs = BridgeSpecs::new("B-1", "Bridge", BridgeType::Truss)
            .span_length(1280.0)
            .year_built(1937)
            .daily_traffic(112_000);

        let mut parameters = BTreeMap::new();
        parameters.insert(Parameter::Sed, 55.0);
        parameters.insert(Parameter::Afc, 0.3);
        let status = BridgeStatus {
            structure_id: "B-1".into(),
            timestamp_ms: 0,
            overall_health: 80.0,
            risk_level: RiskLevel::Safe,
            parameters,
            alerts: Vec::new(),
            remaining_life_months: None,
        };

        let features = feature_vector(&specs, Some(&status));
        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(features[0], 1.28);
        assert_eq!(features[1], 1937.0 / 2000.0);
        assert_eq!(features[2], 1.12);
        assert_eq!(features[3], 0.3);
        assert_eq!(features[11], 55.0);
        assert_eq!(&features[4..11], &[0.0; 7]);
    }

    #[test]
    fn without_status_parameters_are_zero() {
        let specs = BridgeSpecs::new("B-1", "Bridge", BridgeType::Girder);
        let features = feature_vector(&specs, None);
        assert_eq!(features, vec![0.0; FEATURE_COUNT]);
        assert_eq!(FEATURE_NAMES[5], "CPII");
    }
}
