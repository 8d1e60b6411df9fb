//! One full analysis cycle.
//!
//! route → estimate → nine metrics → health → risk → alerts
//!
//! Every step is a pure function of the batch, the bridge specs, the site
//! data and the shared configuration, so analyzing the same batch twice
//! yields the same status.

use std::collections::BTreeMap;
use std::sync::Arc;

use stalwart_types::{
    current_timestamp_ms, BridgeStatus, Measurement, MetricResult, Parameter, ThresholdTable,
};
use tracing::{info, warn};

use crate::alerts::generate_alerts;
use crate::config::{nominal, AnalysisConfig, SiteInputs};
use crate::error::{AnalysisError, Result};
use crate::estimators::{self, estimate_damping, estimate_decay_time, estimate_frequency};
use crate::health::overall_health;
use crate::metrics::{FlutterInput, MetricInput, DEGRADED_CONFIDENCE};
use crate::risk::{classify_risk, StatusCounts};
use crate::router::{MeasurementRouter, RoutedReadings};
use crate::specs::BridgeSpecs;

/// Output of one cycle: the per-metric results behind the status.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub metrics: BTreeMap<Parameter, MetricResult>,
    pub status: BridgeStatus,
}

/// Runs analysis cycles against a fixed threshold table and configuration.
#[derive(Debug, Clone)]
pub struct AnalysisProcessor {
    thresholds: Arc<ThresholdTable>,
    config: AnalysisConfig,
    router: MeasurementRouter,
}

impl AnalysisProcessor {
    /// Create a processor. The threshold table is validated once here.
    pub fn new(thresholds: Arc<ThresholdTable>, config: AnalysisConfig) -> Result<Self> {
        thresholds.validate()?;
        let router = MeasurementRouter::new().with_min_quality(config.min_quality);
        Ok(Self {
            thresholds,
            config,
            router,
        })
    }

    /// Processor with the standard thresholds and default configuration.
    pub fn standard() -> Self {
        Self {
            thresholds: Arc::new(ThresholdTable::standard()),
            config: AnalysisConfig::default(),
            router: MeasurementRouter::new(),
        }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run a full cycle over one batch of readings.
    ///
    /// Readings that belong to another structure are skipped with a warning.
    /// An empty structure identifier, on the bridge or on a reading, aborts
    /// the cycle.
    pub fn analyze(
        &self,
        specs: &BridgeSpecs,
        site: &SiteInputs,
        measurements: &[Measurement],
    ) -> Result<Assessment> {
        if specs.id.is_empty() {
            return Err(AnalysisError::MissingStructureId);
        }
        if let Some(m) = measurements.iter().find(|m| m.structure_id.is_empty()) {
            return Err(AnalysisError::UnattributedMeasurement {
                sensor_id: m.sensor_id.clone(),
            });
        }

        let own: Vec<&Measurement> = measurements
            .iter()
            .filter(|m| m.structure_id == specs.id)
            .collect();
        let foreign = measurements.len() - own.len();
        if foreign > 0 {
            warn!(structure = %specs.id, count = foreign, "skipping readings for other structures");
        }

        let timestamp_ms = own
            .iter()
            .map(|m| m.timestamp_ms)
            .max()
            .unwrap_or_else(current_timestamp_ms);

        let routed = self.router.route(own.iter().copied());
        let metrics = self.compute_metrics(specs, site, &routed);

        let parameters: BTreeMap<Parameter, f64> =
            metrics.iter().map(|(p, r)| (*p, r.value)).collect();
        let health = overall_health(&parameters, &self.thresholds);
        let risk_level = classify_risk(StatusCounts::tally(metrics.values().map(|r| r.status)), health);
        let alerts = generate_alerts(&specs.id, timestamp_ms, &parameters, &self.thresholds);

        info!(
            structure = %specs.id,
            health,
            risk = %risk_level,
            alerts = alerts.len(),
            "analysis complete"
        );

        let status = BridgeStatus {
            structure_id: specs.id.clone(),
            timestamp_ms,
            overall_health: health,
            risk_level,
            parameters,
            alerts,
            remaining_life_months: None,
        };

        Ok(Assessment { metrics, status })
    }

    /// Compute every metric the routed readings and site data support.
    ///
    /// FFD and TVR need vibration samples and ALSA and SED need strain
    /// samples; the other five are always produced.
    pub fn compute_metrics(
        &self,
        specs: &BridgeSpecs,
        site: &SiteInputs,
        routed: &RoutedReadings,
    ) -> BTreeMap<Parameter, MetricResult> {
        let config = &self.config;
        let thresholds = self.thresholds.as_ref();
        let mut metrics = BTreeMap::new();

        let vibration = routed.vibration();
        let signal = (!vibration.is_empty()).then(|| SignalEstimate {
            frequency: estimate_frequency(vibration, config.sampling_rate_hz),
            damping: estimate_damping(vibration),
            decay_time: estimate_decay_time(vibration, config.sampling_rate_hz),
        });
        let temperature = estimators::mean(routed.temperature());

        if let Some(signal) = &signal {
            let ffd = MetricInput::Ffd {
                current_frequency: signal.frequency,
                baseline_frequency: config.baseline_frequency_hz.unwrap_or(signal.frequency),
                temperature,
                reference_temperature: config.reference_temperature_c,
            };
            metrics.insert(Parameter::Ffd, ffd.calculate(thresholds));

            let tvr = MetricInput::Tvr {
                current_damping: signal.damping,
                baseline_damping: config.baseline_damping,
                current_decay_time: signal.decay_time,
                baseline_decay_time: config.baseline_decay_time_s,
            };
            metrics.insert(Parameter::Tvr, tvr.calculate(thresholds));
        }

        let strain = routed.strain();
        if !strain.is_empty() {
            let alsa = MetricInput::Alsa {
                strain,
                yield_strain: config.yield_strain,
                design_cycles: config.design_cycles,
            };
            metrics.insert(Parameter::Alsa, alsa.calculate(thresholds));

            let sed = MetricInput::Sed {
                local_strain: strain.iter().copied().fold(f64::MIN, f64::max),
                global_strain: estimators::mean(strain).unwrap_or(0.0),
            };
            metrics.insert(Parameter::Sed, sed.calculate(thresholds));
        }

        let cpii = MetricInput::Cpii {
            bridge_type: specs.bridge_type,
            wire_breaks: site.wire_breaks,
            total_wires: site.total_wires,
        };
        metrics.insert(Parameter::Cpii, cpii.calculate(thresholds));

        let mut inputs = Provenance::default();
        let afc = MetricInput::Afc(FlutterInput {
            wind_speed: inputs.resolve(estimators::mean(routed.wind()), nominal::WIND_SPEED),
            vertical_amplitude: inputs.resolve(site.vertical_amplitude, nominal::VERTICAL_AMPLITUDE),
            damping_ratio: inputs.resolve(signal.as_ref().map(|s| s.damping), nominal::DAMPING_RATIO),
            frequency: inputs.resolve(signal.as_ref().map(|s| s.frequency), nominal::FREQUENCY_HZ),
            critical_flutter_speed: specs
                .critical_flutter_speed
                .unwrap_or(config.critical_flutter_speed),
            design_amplitude: config.design_amplitude,
            design_damping: config.design_damping,
            design_frequency: config.design_frequency_hz,
        });
        metrics.insert(Parameter::Afc, inputs.apply(afc.calculate(thresholds)));

        let mut inputs = Provenance::default();
        let lts = MetricInput::Lts {
            temperature_delta: inputs.resolve(
                temperature_swing(routed.temperature()).or(site.temperature_delta),
                nominal::TEMPERATURE_DELTA,
            ),
            measured_expansion: inputs.resolve(site.measured_expansion, nominal::MEASURED_EXPANSION),
            expected_expansion: inputs.resolve(site.expected_expansion, nominal::EXPECTED_EXPANSION),
            material: specs.material.properties(),
        };
        metrics.insert(Parameter::Lts, inputs.apply(lts.calculate(thresholds)));

        let mut inputs = Provenance::default();
        let chloride = routed.corrosion().last().copied().or(site.chloride_concentration);
        let carbonation_known = site.carbonation_depth.is_some() && site.concrete_cover.is_some();
        let ccf = MetricInput::Ccf {
            chloride_concentration: if carbonation_known {
                chloride
            } else {
                Some(inputs.resolve(chloride, nominal::CHLORIDE_CONCENTRATION))
            },
            carbonation_depth: site.carbonation_depth,
            concrete_cover: site.concrete_cover,
        };
        metrics.insert(Parameter::Ccf, inputs.apply(ccf.calculate(thresholds)));

        let mut inputs = Provenance::default();
        let bd = MetricInput::Bd {
            displacement: inputs.resolve(
                estimators::peak_abs(routed.displacement()).or(site.bearing_displacement),
                nominal::BEARING_DISPLACEMENT,
            ),
            capacity: config.displacement_capacity_mm,
        };
        metrics.insert(Parameter::Bd, inputs.apply(bd.calculate(thresholds)));

        metrics
    }
}

#[derive(Debug, Clone, Copy)]
struct SignalEstimate {
    frequency: f64,
    damping: f64,
    decay_time: f64,
}

/// Counts inputs that had to fall back to a nominal value.
#[derive(Debug, Default)]
struct Provenance {
    nominal: usize,
}

impl Provenance {
    fn resolve(&mut self, observed: Option<f64>, nominal: f64) -> f64 {
        observed.unwrap_or_else(|| {
            self.nominal += 1;
            nominal
        })
    }

    fn apply(self, result: MetricResult) -> MetricResult {
        if self.nominal == 0 {
            result
        } else {
            result
                .cap_confidence(DEGRADED_CONFIDENCE)
                .detail("nominal_inputs", self.nominal as f64)
        }
    }
}

/// Temperature range over the window, when at least two readings exist.
fn temperature_swing(temperatures: &[f64]) -> Option<f64> {
    if temperatures.len() < 2 {
        return None;
    }
    let (lo, hi) = temperatures
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(*t), hi.max(*t)));
    Some(hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::BridgeType;
    use stalwart_types::{MetricStatus, RiskLevel, ThresholdSpec};
    use std::f64::consts::PI;

    fn specs() -> BridgeSpecs {
        BridgeSpecs::new("TEST-001", "Test Bridge", BridgeType::Girder)
            .span_length(450.0)
            .year_built(1985)
    }

    fn batch() -> Vec<Measurement> {
        let mut readings = Vec::new();
        for i in 0..500u64 {
            let t = i as f64 / 100.0;
            let value = 0.05 * (2.0 * PI * 1.2 * t).sin();
            readings.push(Measurement::new("ACC-001", "TEST-001", 1_000 + i * 10, value, "m/s²"));
        }
        for i in 0..60u64 {
            let value = 150.0 + 10.0 * ((i % 6) as f64 - 2.5);
            readings.push(Measurement::new("STR-001", "TEST-001", 1_000 + i * 100, value, "µε"));
        }
        readings.push(Measurement::new("TEMP-001", "TEST-001", 2_000, 18.0, "°C"));
        readings.push(Measurement::new("WIND-001", "TEST-001", 2_000, 12.0, "m/s"));
        readings
    }

    #[test]
    fn full_cycle_produces_all_parameters() {
        let processor = AnalysisProcessor::standard();
        let assessment = processor.analyze(&specs(), &SiteInputs::default(), &batch()).unwrap();

        assert_eq!(assessment.metrics.len(), 9);
        let status = &assessment.status;
        assert_eq!(status.structure_id, "TEST-001");
        // Newest reading is the last strain sample.
        assert_eq!(status.timestamp_ms, 1_000 + 59 * 100);
        assert_eq!(status.parameters.len(), 9);
        assert!((0.0..=100.0).contains(&status.overall_health));

        // Nominal bearing displacement (8.5 mm of 25) is 34 %.
        let bd = &assessment.metrics[&Parameter::Bd];
        assert!((bd.value - 34.0).abs() < 1e-9);
        assert!(bd.is(MetricStatus::Critical));
        assert_eq!(bd.confidence, DEGRADED_CONFIDENCE);
        assert_eq!(bd.details["nominal_inputs"], 1.0);
        assert_eq!(status.risk_level, RiskLevel::Critical);
        assert!(status.alerts.iter().any(|a| a.parameter == Parameter::Bd));
    }

    #[test]
    fn frequency_baseline_defaults_to_estimate() {
        let processor = AnalysisProcessor::standard();
        let assessment = processor.analyze(&specs(), &SiteInputs::default(), &batch()).unwrap();
        assert_eq!(assessment.status.parameter(Parameter::Ffd), Some(0.0));
    }

    #[test]
    fn analysis_is_idempotent() {
        let processor = AnalysisProcessor::standard();
        let readings = batch();
        let first = processor.analyze(&specs(), &SiteInputs::default(), &readings).unwrap();
        let second = processor.analyze(&specs(), &SiteInputs::default(), &readings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn vibration_and_strain_metrics_need_samples() {
        let processor = AnalysisProcessor::standard();
        let readings = vec![Measurement::new("LVDT-001", "TEST-001", 5, 2.0, "mm")];
        let assessment = processor.analyze(&specs(), &SiteInputs::default(), &readings).unwrap();

        let present: Vec<Parameter> = assessment.metrics.keys().copied().collect();
        assert_eq!(
            present,
            vec![Parameter::Afc, Parameter::Cpii, Parameter::Lts, Parameter::Ccf, Parameter::Bd]
        );
        // Measured displacement replaces the nominal one.
        let bd = &assessment.metrics[&Parameter::Bd];
        assert!((bd.value - 8.0).abs() < 1e-9);
        assert_eq!(bd.confidence, 0.95);
    }

    #[test]
    fn site_inputs_are_used() {
        let processor = AnalysisProcessor::standard();
        let specs = BridgeSpecs::new("TEST-001", "Cable", BridgeType::CableStayed);
        let site = SiteInputs {
            wire_breaks: Some(5),
            total_wires: Some(1000),
            carbonation_depth: Some(20.0),
            concrete_cover: Some(50.0),
            ..SiteInputs::default()
        };
        let readings = vec![Measurement::new("XYZ-1", "TEST-001", 5, 0.0, "")];
        let assessment = processor.analyze(&specs, &site, &readings).unwrap();

        assert!((assessment.status.parameter(Parameter::Cpii).unwrap() - 0.75).abs() < 1e-12);
        let ccf = &assessment.metrics[&Parameter::Ccf];
        assert!((ccf.value - 40.0).abs() < 1e-9);
        assert_eq!(ccf.confidence, 0.85);
    }

    #[test]
    fn foreign_readings_are_skipped() {
        let processor = AnalysisProcessor::standard();
        let mut readings = batch();
        let own = processor.analyze(&specs(), &SiteInputs::default(), &readings).unwrap();

        readings.push(Measurement::new("LVDT-001", "OTHER-001", 9_999_999, 24.0, "mm"));
        let mixed = processor.analyze(&specs(), &SiteInputs::default(), &readings).unwrap();
        assert_eq!(own, mixed);
    }

    #[test]
    fn empty_batch_is_not_an_error() {
        let processor = AnalysisProcessor::standard();
        let assessment = processor.analyze(&specs(), &SiteInputs::default(), &[]).unwrap();
        assert_eq!(assessment.metrics.len(), 5);
        assert!(assessment.status.timestamp_ms > 0);
    }

    #[test]
    fn structural_violations_are_fatal() {
        let processor = AnalysisProcessor::standard();
        let nameless = BridgeSpecs::new("", "Nameless", BridgeType::Arch);
        assert_eq!(
            processor.analyze(&nameless, &SiteInputs::default(), &[]),
            Err(AnalysisError::MissingStructureId)
        );

        let readings = vec![Measurement::new("ACC-001", "", 1, 0.1, "")];
        assert_eq!(
            processor.analyze(&specs(), &SiteInputs::default(), &readings),
            Err(AnalysisError::UnattributedMeasurement {
                sensor_id: "ACC-001".to_string()
            })
        );
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let table = ThresholdTable::standard().with(Parameter::Bd, ThresholdSpec::new(20.0, 15.0, 10.0));
        let result = AnalysisProcessor::new(Arc::new(table), AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::Thresholds(_))));
    }

    #[test]
    fn missing_spec_skips_classification() {
        let mut table = ThresholdTable::standard();
        table.remove(Parameter::Bd);
        let processor = AnalysisProcessor::new(Arc::new(table), AnalysisConfig::default()).unwrap();
        let assessment = processor.analyze(&specs(), &SiteInputs::default(), &[]).unwrap();

        assert_eq!(assessment.metrics[&Parameter::Bd].status, None);
        assert!(assessment.status.parameter(Parameter::Bd).is_some());
        assert!(assessment.status.alerts.iter().all(|a| a.parameter != Parameter::Bd));
    }

    #[test]
    fn temperature_swing_needs_two_readings() {
        assert_eq!(temperature_swing(&[12.0]), None);
        assert_eq!(temperature_swing(&[12.0, 30.0, 18.0]), Some(18.0));
    }
}
