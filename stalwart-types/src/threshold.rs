//! Threshold specifications and the per-parameter threshold table.

use std::collections::BTreeMap;

use crate::{AlertLevel, MetricStatus, Parameter, ThresholdError};

/// Warning/caution/critical boundaries for one parameter.
///
/// For a normal parameter the boundaries ascend (higher is worse). For an
/// inverted parameter they descend, since higher values are safer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdSpec {
    pub warning: f64,
    pub caution: f64,
    pub critical: f64,

    /// Lowest value the parameter is expected to take.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min: f64,

    /// Highest value the parameter is expected to take.
    ///
    /// Used by the health aggregator to normalize non-inverted parameters.
    #[cfg_attr(feature = "serde", serde(default = "default_max"))]
    pub max: f64,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub unit: Option<String>,

    /// Higher values are safer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
}

#[cfg(feature = "serde")]
fn default_max() -> f64 {
    1.0
}

impl ThresholdSpec {
    /// Create a non-inverted spec over the range `[0, 1]` with no unit.
    pub fn new(warning: f64, caution: f64, critical: f64) -> Self {
        Self {
            warning,
            caution,
            critical,
            min: 0.0,
            max: 1.0,
            unit: None,
            inverted: false,
        }
    }

    /// Set the expected value range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the unit label.
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Mark this parameter as inverted (higher is safer).
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Classify a value into a metric status.
    ///
    /// Below `warning` is SAFE, below `caution` WARNING, below `critical`
    /// CAUTION, otherwise CRITICAL. Inverted specs use "greater than" in
    /// place of "less than".
    pub fn classify(&self, value: f64) -> MetricStatus {
        let better = |boundary: f64| {
            if self.inverted {
                value > boundary
            } else {
                value < boundary
            }
        };

        if better(self.warning) {
            MetricStatus::Safe
        } else if better(self.caution) {
            MetricStatus::Warning
        } else if better(self.critical) {
            MetricStatus::Caution
        } else {
            MetricStatus::Critical
        }
    }

    /// Alert level for a value, most severe boundary first.
    ///
    /// Always compares with "greater or equal", whatever the direction of the
    /// spec. For inverted specs this disagrees with [`classify`](Self::classify);
    /// alerting and status classification are deliberately independent.
    pub fn alert_level(&self, value: f64) -> Option<AlertLevel> {
        if value >= self.critical {
            Some(AlertLevel::Critical)
        } else if value >= self.caution {
            Some(AlertLevel::Caution)
        } else if value >= self.warning {
            Some(AlertLevel::Warning)
        } else {
            None
        }
    }

    /// Check that the boundaries are strictly monotonic in the badness
    /// direction and the range is non-empty.
    pub fn validate(&self, parameter: Parameter) -> Result<(), ThresholdError> {
        let (monotonic, order) = if self.inverted {
            (
                self.warning > self.caution && self.caution > self.critical,
                "descending",
            )
        } else {
            (
                self.warning < self.caution && self.caution < self.critical,
                "ascending",
            )
        };

        if !monotonic {
            return Err(ThresholdError::NonMonotonic {
                parameter,
                order,
                warning: self.warning,
                caution: self.caution,
                critical: self.critical,
            });
        }

        if !(self.min < self.max) {
            return Err(ThresholdError::InvalidRange {
                parameter,
                min: self.min,
                max: self.max,
            });
        }

        Ok(())
    }
}

/// Threshold specs keyed by parameter.
///
/// Built once, then shared read-only by the metric calculators, the health
/// aggregator and the alert generator. A parameter without an entry cannot be
/// classified and is skipped by status-based risk classification and alerting.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ThresholdTable {
    specs: BTreeMap<Parameter, ThresholdSpec>,
}

impl ThresholdTable {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard table for all nine parameters.
    pub fn standard() -> Self {
        Self::empty()
            .with(Parameter::Afc, ThresholdSpec::new(0.60, 0.75, 0.85))
            .with(
                Parameter::Alsa,
                ThresholdSpec::new(0.60, 0.75, 0.90).range(0.0, 2.0),
            )
            .with(
                Parameter::Cpii,
                ThresholdSpec::new(0.90, 0.75, 0.60).inverted(),
            )
            .with(
                Parameter::Ffd,
                ThresholdSpec::new(3.0, 5.0, 8.0).range(-1.0, 15.0).unit("%"),
            )
            .with(
                Parameter::Lts,
                ThresholdSpec::new(15.0, 30.0, 50.0)
                    .range(0.0, 100.0)
                    .unit("% of yield"),
            )
            .with(
                Parameter::Ccf,
                ThresholdSpec::new(40.0, 70.0, 100.0).range(0.0, 200.0).unit("%"),
            )
            .with(
                Parameter::Tvr,
                ThresholdSpec::new(0.85, 0.70, 0.55).inverted(),
            )
            .with(
                Parameter::Bd,
                ThresholdSpec::new(10.0, 15.0, 20.0).range(-25.0, 25.0).unit("mm"),
            )
            .with(
                Parameter::Sed,
                ThresholdSpec::new(50.0, 70.0, 85.0).range(0.0, 100.0).unit("%"),
            )
    }

    /// Add or replace the spec for a parameter.
    pub fn with(mut self, parameter: Parameter, spec: ThresholdSpec) -> Self {
        self.specs.insert(parameter, spec);
        self
    }

    /// Add or replace the spec for a parameter in place.
    pub fn insert(&mut self, parameter: Parameter, spec: ThresholdSpec) -> Option<ThresholdSpec> {
        self.specs.insert(parameter, spec)
    }

    /// Remove the spec for a parameter.
    pub fn remove(&mut self, parameter: Parameter) -> Option<ThresholdSpec> {
        self.specs.remove(&parameter)
    }

    pub fn get(&self, parameter: Parameter) -> Option<&ThresholdSpec> {
        self.specs.get(&parameter)
    }

    pub fn contains(&self, parameter: Parameter) -> bool {
        self.specs.contains_key(&parameter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Parameter, &ThresholdSpec)> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Whether every one of the nine parameters has a spec.
    pub fn is_complete(&self) -> bool {
        Parameter::ALL.iter().all(|p| self.specs.contains_key(p))
    }

    /// Parameters with no configured spec.
    pub fn missing(&self) -> Vec<Parameter> {
        Parameter::ALL
            .iter()
            .copied()
            .filter(|p| !self.specs.contains_key(p))
            .collect()
    }

    /// Validate every configured spec.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        self.specs
            .iter()
            .try_for_each(|(parameter, spec)| spec.validate(*parameter))
    }
}

impl FromIterator<(Parameter, ThresholdSpec)> for ThresholdTable {
    fn from_iter<I: IntoIterator<Item = (Parameter, ThresholdSpec)>>(iter: I) -> Self {
        Self {
            specs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_complete_and_monotonic() {
        let table = ThresholdTable::standard();
        assert!(table.is_complete());
        assert_eq!(table.len(), 9);
        assert!(table.validate().is_ok());

        for (_, spec) in table.iter() {
            if spec.inverted {
                assert!(spec.warning > spec.caution && spec.caution > spec.critical);
            } else {
                assert!(spec.warning < spec.caution && spec.caution < spec.critical);
            }
        }
    }

    #[test]
    fn standard_boundaries() {
        let table = ThresholdTable::standard();
        let afc = table.get(Parameter::Afc).unwrap();
        assert_eq!((afc.warning, afc.caution, afc.critical), (0.60, 0.75, 0.85));
        let alsa = table.get(Parameter::Alsa).unwrap();
        assert_eq!((alsa.warning, alsa.caution, alsa.critical), (0.60, 0.75, 0.90));
        let ffd = table.get(Parameter::Ffd).unwrap();
        assert_eq!((ffd.warning, ffd.caution, ffd.critical), (3.0, 5.0, 8.0));
        assert_eq!(ffd.unit.as_deref(), Some("%"));
        assert!(table.get(Parameter::Tvr).unwrap().inverted);
        assert!(!table.get(Parameter::Bd).unwrap().inverted);
    }

    #[test]
    fn classify_ascending() {
        let spec = ThresholdSpec::new(10.0, 15.0, 20.0);
        assert_eq!(spec.classify(5.0), MetricStatus::Safe);
        assert_eq!(spec.classify(10.0), MetricStatus::Warning);
        assert_eq!(spec.classify(14.9), MetricStatus::Warning);
        assert_eq!(spec.classify(15.0), MetricStatus::Caution);
        assert_eq!(spec.classify(20.0), MetricStatus::Critical);
        assert_eq!(spec.classify(34.0), MetricStatus::Critical);
    }

    #[test]
    fn classify_inverted() {
        let spec = ThresholdSpec::new(0.85, 0.70, 0.55).inverted();
        assert_eq!(spec.classify(0.95), MetricStatus::Safe);
        assert_eq!(spec.classify(0.85), MetricStatus::Warning);
        assert_eq!(spec.classify(0.71), MetricStatus::Warning);
        assert_eq!(spec.classify(0.60), MetricStatus::Caution);
        assert_eq!(spec.classify(0.55), MetricStatus::Critical);
        assert_eq!(spec.classify(0.10), MetricStatus::Critical);
    }

    #[test]
    fn alert_level_ignores_inversion() {
        let spec = ThresholdSpec::new(0.90, 0.75, 0.60).inverted();
        // A perfectly healthy inverted value still crosses the critical
        // boundary under ">=" comparisons.
        assert_eq!(spec.alert_level(1.0), Some(AlertLevel::Critical));
        assert_eq!(spec.classify(1.0), MetricStatus::Safe);
        assert_eq!(spec.alert_level(0.5), None);
    }

    #[test]
    fn alert_level_ascending() {
        let spec = ThresholdSpec::new(10.0, 15.0, 20.0);
        assert_eq!(spec.alert_level(9.99), None);
        assert_eq!(spec.alert_level(10.0), Some(AlertLevel::Warning));
        assert_eq!(spec.alert_level(15.0), Some(AlertLevel::Caution));
        assert_eq!(spec.alert_level(34.0), Some(AlertLevel::Critical));
    }

    #[test]
    fn validate_rejects_non_monotonic() {
        let table = ThresholdTable::empty().with(Parameter::Bd, ThresholdSpec::new(10.0, 5.0, 20.0));
        let err = table.validate().unwrap_err();
        assert!(matches!(
            err,
            ThresholdError::NonMonotonic {
                parameter: Parameter::Bd,
                order: "ascending",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_ascending_inverted() {
        let spec = ThresholdSpec::new(0.55, 0.70, 0.85).inverted();
        assert!(spec.validate(Parameter::Tvr).is_err());
    }

    #[test]
    fn validate_rejects_empty_range() {
        let spec = ThresholdSpec::new(1.0, 2.0, 3.0).range(5.0, 5.0);
        assert!(matches!(
            spec.validate(Parameter::Sed),
            Err(ThresholdError::InvalidRange { .. })
        ));
    }

    #[test]
    fn missing_parameters() {
        let mut table = ThresholdTable::standard();
        table.remove(Parameter::Ccf);
        assert!(!table.is_complete());
        assert_eq!(table.missing(), vec![Parameter::Ccf]);
        assert!(!table.contains(Parameter::Ccf));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_table_is_keyed_by_code() {
        let json = r#"{
            "BD": { "warning": 5.0, "caution": 10.0, "critical": 15.0, "max": 30.0, "unit": "mm" },
            "tvr": { "warning": 0.9, "caution": 0.8, "critical": 0.7, "inverted": true }
        }"#;
        let table: ThresholdTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 2);
        let bd = table.get(Parameter::Bd).unwrap();
        assert_eq!(bd.max, 30.0);
        assert_eq!(bd.min, 0.0);
        let tvr = table.get(Parameter::Tvr).unwrap();
        assert!(tvr.inverted);
        assert_eq!(tvr.max, 1.0);
        assert!(table.validate().is_ok());
    }
}
