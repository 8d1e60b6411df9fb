//! A monitored structure and its state across analysis cycles.

use std::collections::BTreeMap;
use std::sync::Arc;

use stalwart_types::{Alert, BridgeStatus, Measurement, MetricResult, Parameter};
use tracing::debug;

use crate::alerts::generate_alerts;
use crate::buffer::RingBuffer;
use crate::config::SiteInputs;
use crate::error::{AnalysisError, Result};
use crate::features::feature_vector;
use crate::processor::AnalysisProcessor;
use crate::specs::BridgeSpecs;

/// A bridge under monitoring.
///
/// Owns the rolling per-sensor reading log, the latest status and the
/// append-only alert history. Each cycle replaces the status wholesale.
#[derive(Debug)]
pub struct Bridge {
    specs: BridgeSpecs,
    site: SiteInputs,
    processor: Arc<AnalysisProcessor>,
    readings: BTreeMap<String, RingBuffer<Measurement>>,
    status: Option<BridgeStatus>,
    metrics: BTreeMap<Parameter, MetricResult>,
    alerts: Vec<Alert>,
}

impl Bridge {
    /// Create a bridge. Fails if the specs carry no identifier.
    pub fn new(specs: BridgeSpecs, processor: Arc<AnalysisProcessor>) -> Result<Self> {
        if specs.id.is_empty() {
            return Err(AnalysisError::MissingStructureId);
        }
        Ok(Self {
            specs,
            site: SiteInputs::default(),
            processor,
            readings: BTreeMap::new(),
            status: None,
            metrics: BTreeMap::new(),
            alerts: Vec::new(),
        })
    }

    pub fn with_site_inputs(mut self, site: SiteInputs) -> Self {
        self.site = site;
        self
    }

    pub fn id(&self) -> &str {
        &self.specs.id
    }

    pub fn specs(&self) -> &BridgeSpecs {
        &self.specs
    }

    pub fn site_inputs(&self) -> &SiteInputs {
        &self.site
    }

    /// Replace the inspection data used by later cycles.
    pub fn set_site_inputs(&mut self, site: SiteInputs) {
        self.site = site;
    }

    /// Append readings to the per-sensor log, returning how many were kept.
    ///
    /// Readings for other structures are ignored. Once a sensor's log is
    /// full its oldest reading is dropped.
    pub fn record(&mut self, measurements: &[Measurement]) -> Result<usize> {
        if let Some(m) = measurements.iter().find(|m| m.structure_id.is_empty()) {
            return Err(AnalysisError::UnattributedMeasurement {
                sensor_id: m.sensor_id.clone(),
            });
        }

        let capacity = self.processor.config().buffer_capacity;
        let mut recorded = 0;
        for m in measurements.iter().filter(|m| m.structure_id == self.specs.id) {
            self.readings
                .entry(m.sensor_id.clone())
                .or_insert_with(|| RingBuffer::with_capacity(capacity))
                .push(m.clone());
            recorded += 1;
        }

        debug!(structure = %self.specs.id, recorded, sensors = self.readings.len(), "recorded readings");
        Ok(recorded)
    }

    /// Record a batch and run a full analysis cycle over it.
    ///
    /// The new status replaces the previous one and its alerts are appended
    /// to the history.
    pub fn update_status(&mut self, measurements: &[Measurement]) -> Result<&BridgeStatus> {
        self.record(measurements)?;
        let assessment = self.processor.analyze(&self.specs, &self.site, measurements)?;

        self.alerts.extend(assessment.status.alerts.iter().cloned());
        self.metrics = assessment.metrics;
        Ok(&*self.status.insert(assessment.status))
    }

    /// Re-scan the current status against the thresholds.
    ///
    /// The alerts found are appended to the history and returned. Without a
    /// status there is nothing to check.
    pub fn check_alerts(&mut self) -> Vec<Alert> {
        let Some(status) = &self.status else {
            return Vec::new();
        };

        let alerts = generate_alerts(
            &status.structure_id,
            status.timestamp_ms,
            &status.parameters,
            self.processor.thresholds(),
        );
        self.alerts.extend(alerts.iter().cloned());
        alerts
    }

    pub fn status(&self) -> Option<&BridgeStatus> {
        self.status.as_ref()
    }

    /// Per-metric results of the latest cycle.
    pub fn metrics(&self) -> &BTreeMap<Parameter, MetricResult> {
        &self.metrics
    }

    /// Current value of a parameter.
    pub fn parameter(&self, parameter: Parameter) -> Option<f64> {
        self.status.as_ref()?.parameter(parameter)
    }

    /// Attach a remaining-life estimate from an external predictor to the
    /// current status.
    pub fn set_remaining_life(&mut self, months: f64) {
        if let Some(status) = self.status.take() {
            self.status = Some(status.with_remaining_life(months));
        }
    }

    /// Logged readings of one sensor, oldest first.
    pub fn recent_readings(&self, sensor_id: &str) -> impl Iterator<Item = &Measurement> + '_ {
        self.readings.get(sensor_id).into_iter().flat_map(|b| b.iter())
    }

    /// Sensors with at least one logged reading.
    pub fn sensor_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.readings.keys().map(String::as_str)
    }

    /// Every alert raised so far, oldest first.
    pub fn alert_history(&self) -> &[Alert] {
        &self.alerts
    }

    /// The last `n` alerts.
    pub fn recent_alerts(&self, n: usize) -> &[Alert] {
        &self.alerts[self.alerts.len().saturating_sub(n)..]
    }

    /// Features for a remaining-life predictor.
    pub fn feature_vector(&self) -> Vec<f64> {
        feature_vector(&self.specs, self.status.as_ref())
    }
}
