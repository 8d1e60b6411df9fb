//! Threshold-crossing alerts.
//!
//! Alerting compares raw values with "greater or equal" against each
//! boundary, independently of metric classification. For inverted
//! parameters the two disagree: a perfect CPII of 1.0 is SAFE for the risk
//! classifier yet crosses the 0.60 boundary here and raises a CRITICAL
//! alert. Both behaviors are kept as they are.

use std::collections::BTreeMap;

use stalwart_types::{Alert, Parameter, ThresholdTable};
use tracing::warn;

/// Build one alert per parameter whose value crosses a configured boundary.
///
/// Parameters without a spec are skipped.
pub fn generate_alerts(
    structure_id: &str,
    timestamp_ms: u64,
    values: &BTreeMap<Parameter, f64>,
    thresholds: &ThresholdTable,
) -> Vec<Alert> {
    values
        .iter()
        .filter_map(|(&parameter, &value)| {
            let level = thresholds.get(parameter)?.alert_level(value)?;
            let alert = Alert::new(structure_id, timestamp_ms, parameter, value, level);
            warn!(structure = structure_id, "alert: {}", alert.message);
            Some(alert)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stalwart_types::AlertLevel;

    fn values(pairs: &[(Parameter, f64)]) -> BTreeMap<Parameter, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn most_severe_boundary_wins() {
        let t = ThresholdTable::standard();
        let alerts = generate_alerts(
            "TEST-001",
            42,
            &values(&[(Parameter::Bd, 34.0), (Parameter::Lts, 16.0), (Parameter::Sed, 72.0)]),
            &t,
        );

        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].parameter, Parameter::Lts);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert_eq!(alerts[1].parameter, Parameter::Bd);
        assert_eq!(alerts[1].level, AlertLevel::Critical);
        assert_eq!(alerts[1].message, "BD = 34.000 (CRITICAL)");
        assert_eq!(alerts[2].level, AlertLevel::Caution);
        assert!(alerts.iter().all(|a| a.structure_id == "TEST-001" && a.timestamp_ms == 42));
    }

    #[test]
    fn values_in_range_raise_nothing() {
        let t = ThresholdTable::standard();
        let alerts = generate_alerts("B", 0, &values(&[(Parameter::Bd, 9.99), (Parameter::Afc, 0.2)]), &t);
        assert!(alerts.is_empty());
    }

    #[test]
    fn boundaries_are_inclusive() {
        let t = ThresholdTable::standard();
        let alerts = generate_alerts("B", 0, &values(&[(Parameter::Bd, 10.0)]), &t);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
    }

    #[test]
    fn inverted_parameters_use_raw_comparison() {
        let t = ThresholdTable::standard();
        let alerts = generate_alerts("B", 0, &values(&[(Parameter::Cpii, 1.0), (Parameter::Tvr, 0.5)]), &t);
        // CPII 1.0 >= 0.60 critical boundary; TVR 0.5 is below all three.
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].parameter, Parameter::Cpii);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
    }

    #[test]
    fn missing_spec_is_skipped() {
        let mut t = ThresholdTable::standard();
        t.remove(Parameter::Bd);
        let alerts = generate_alerts("B", 0, &values(&[(Parameter::Bd, 34.0)]), &t);
        assert!(alerts.is_empty());
    }
}
