//! Wiring between settings, the fleet and the monitoring loop.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use stalwart_engine::{
    AnalysisProcessor, BridgeSpecs, BridgeStatus, BridgeType, Fleet, Measurement,
    MeasurementSource, Monitor, Output, SiteInputs,
};
use tracing::{info, warn};

use crate::settings::Settings;

/// A configured fleet ready to analyze readings.
#[derive(Debug)]
pub struct App {
    settings: Settings,
    fleet: Arc<Fleet>,
}

impl App {
    /// Build the processor from the settings and register the configured
    /// bridge, if any.
    ///
    /// Fails when the threshold overrides produce an invalid table.
    pub fn new(settings: Settings) -> Result<Self> {
        let thresholds = Arc::new(settings.threshold_table()?);
        let processor = AnalysisProcessor::new(thresholds, settings.analysis_config())?;
        let fleet = Arc::new(Fleet::new(Arc::new(processor)));

        if let Some(specs) = &settings.bridge {
            fleet.register_with(specs.clone(), settings.site.clone())?;
            info!(structure = %specs.id, bridge_type = %specs.bridge_type, "registered bridge");
        }

        Ok(Self { settings, fleet })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fleet(&self) -> &Arc<Fleet> {
        &self.fleet
    }

    /// Register every structure named in `measurements` that is not yet
    /// known, using default specs. Does nothing when a bridge is
    /// configured. Returns how many bridges were added.
    pub fn register_structures(&self, measurements: &[Measurement]) -> Result<usize> {
        if self.settings.bridge.is_some() {
            return Ok(0);
        }
        register_new_structures(&self.fleet, &self.settings.site, measurements)
    }

    /// Wrap a source for the monitoring loop.
    ///
    /// Without a configured bridge, every polled batch has its unknown
    /// structures registered before the monitor ingests it.
    pub fn monitored_source<S>(&self, source: S) -> Box<dyn MeasurementSource>
    where
        S: MeasurementSource + 'static,
    {
        if self.settings.bridge.is_some() {
            return Box::new(source);
        }
        Box::new(AutoRegister {
            inner: source,
            fleet: self.fleet.clone(),
            site: self.settings.site.clone(),
        })
    }

    /// Run one analysis cycle per structure in the batch.
    pub fn analyze(&self, measurements: &[Measurement]) -> Result<Vec<BridgeStatus>> {
        self.register_structures(measurements)?;
        Ok(self.fleet.ingest(measurements)?)
    }

    /// Build a monitor over this fleet.
    pub fn monitor(&self, interval: Duration, outputs: Vec<Output>) -> Monitor {
        outputs
            .into_iter()
            .fold(Monitor::builder(self.fleet.clone()), |builder, output| builder.output(output))
            .interval(interval)
            .build()
    }
}

fn register_new_structures(
    fleet: &Fleet,
    site: &SiteInputs,
    measurements: &[Measurement],
) -> Result<usize> {
    let ids: BTreeSet<&str> = measurements
        .iter()
        .map(|m| m.structure_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    let mut added = 0;
    for id in ids {
        if fleet.get(id).is_some() {
            continue;
        }
        let specs = BridgeSpecs::new(id, id, BridgeType::default());
        fleet.register_with(specs, site.clone())?;
        info!(structure = id, "registered bridge with default specs");
        added += 1;
    }
    Ok(added)
}

/// Registers the structures of each batch as it is polled.
#[derive(Debug)]
struct AutoRegister<S> {
    inner: S,
    fleet: Arc<Fleet>,
    site: SiteInputs,
}

impl<S: MeasurementSource> MeasurementSource for AutoRegister<S> {
    fn poll(&mut self) -> Option<Vec<Measurement>> {
        let batch = self.inner.poll()?;
        if let Err(e) = register_new_structures(&self.fleet, &self.site, &batch) {
            warn!(source = self.inner.description(), "failed to register structures: {}", e);
        }
        Some(batch)
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn error(&self) -> Option<&str> {
        self.inner.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ThresholdOverride;
    use crate::source::ChannelSource;
    use stalwart_engine::{Parameter, RiskLevel};

    fn readings() -> Vec<Measurement> {
        vec![
            Measurement::new("LVDT-001", "A", 10, 2.5, "mm"),
            Measurement::new("LVDT-001", "B", 20, 1.0, "mm"),
        ]
    }

    #[test]
    fn analyze_registers_unknown_structures() {
        let app = App::new(Settings::default()).unwrap();
        assert!(app.fleet().is_empty());

        let statuses = app.analyze(&readings()).unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(app.fleet().ids(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(statuses[1].timestamp_ms, 20);

        // Already registered
        assert_eq!(app.register_structures(&readings()).unwrap(), 0);
    }

    #[test]
    fn configured_bridge_ignores_other_structures() {
        let settings = Settings {
            bridge: Some(BridgeSpecs::new("A", "Alpha", BridgeType::Truss)),
            ..Settings::default()
        };
        let app = App::new(settings).unwrap();

        let statuses = app.analyze(&readings()).unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].structure_id, "A");
        assert!(app.fleet().get("B").is_none());
    }

    #[test]
    fn threshold_overrides_reach_the_processor() {
        let mut settings = Settings::default();
        settings.thresholds.insert(
            "bd".into(),
            ThresholdOverride {
                warning: Some(5.0),
                caution: Some(8.0),
                critical: Some(9.0),
                ..Default::default()
            },
        );
        let app = App::new(settings).unwrap();

        let statuses = app
            .analyze(&[Measurement::new("LVDT-001", "A", 1, 2.5, "mm")])
            .unwrap();
        let bd = statuses[0].parameter(Parameter::Bd).unwrap();
        assert!((bd - 10.0).abs() < 1e-9);
        assert!(app
            .fleet()
            .processor()
            .thresholds()
            .get(Parameter::Bd)
            .is_some_and(|spec| spec.critical == 9.0));
        assert_ne!(statuses[0].risk_level, RiskLevel::Safe);
    }

    #[test]
    fn invalid_overrides_fail_startup() {
        let mut settings = Settings::default();
        settings.thresholds.insert(
            "SED".into(),
            ThresholdOverride {
                warning: Some(90.0),
                ..Default::default()
            },
        );
        assert!(App::new(settings).is_err());
    }

    #[test]
    fn monitor_cycle_over_channel_source() {
        let settings = Settings {
            bridge: Some(BridgeSpecs::new("A", "Alpha", BridgeType::Girder)),
            ..Settings::default()
        };
        let app = App::new(settings).unwrap();
        let (output, mut statuses) = Output::channel(4);
        let monitor = app.monitor(Duration::from_secs(1), vec![output]);
        assert_eq!(monitor.interval(), Duration::from_secs(1));

        let (tx, mut source) = ChannelSource::create("test", 4);
        tx.try_send(vec![Measurement::new("LVDT-001", "A", 5, 2.5, "mm")])
            .unwrap();

        let emitted = tokio_test::block_on(monitor.run_once(&mut source));
        assert_eq!(emitted.len(), 1);
        assert_eq!(statuses.try_recv().unwrap().timestamp_ms, 5);
    }

    #[test]
    fn monitored_source_registers_structures_from_later_batches() {
        let app = App::new(Settings::default()).unwrap();
        let monitor = app.monitor(Duration::from_secs(1), Vec::new());
        let (tx, source) = ChannelSource::create("test", 4);
        let mut source = app.monitored_source(source);

        tx.try_send(vec![Measurement::new("LVDT-001", "A", 1, 2.5, "mm")])
            .unwrap();
        let first = tokio_test::block_on(monitor.run_once(source.as_mut()));
        assert_eq!(first.len(), 1);

        // A structure that was unknown when monitoring started
        tx.try_send(vec![Measurement::new("LVDT-001", "B", 2, 1.0, "mm")])
            .unwrap();
        let second = tokio_test::block_on(monitor.run_once(source.as_mut()));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].structure_id, "B");
        assert_eq!(app.fleet().ids(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn monitored_source_keeps_configured_bridge_only() {
        let settings = Settings {
            bridge: Some(BridgeSpecs::new("A", "Alpha", BridgeType::Girder)),
            ..Settings::default()
        };
        let app = App::new(settings).unwrap();
        let monitor = app.monitor(Duration::from_secs(1), Vec::new());
        let (tx, source) = ChannelSource::create("test", 4);
        let mut source = app.monitored_source(source);

        tx.try_send(vec![Measurement::new("LVDT-001", "B", 2, 1.0, "mm")])
            .unwrap();
        assert!(tokio_test::block_on(monitor.run_once(source.as_mut())).is_empty());
        assert!(app.fleet().get("B").is_none());
    }
}
