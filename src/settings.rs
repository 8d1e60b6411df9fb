//! Layered runtime configuration.
//!
//! Settings come from an optional file (TOML, YAML or JSON, picked by
//! extension) and then from `STALWART_*` environment variables, with `__`
//! separating nested keys:
//!
//! ```bash
//! STALWART_MONITOR__INTERVAL_SECS=5 stalwart --mode monitor
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use stalwart_engine::{AnalysisConfig, BridgeSpecs, SiteInputs};
use stalwart_types::{Parameter, ThresholdSpec, ThresholdTable};

/// Everything the binary needs to build a fleet and run it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The monitored bridge. Without one, every structure named in the
    /// readings is registered with default specs.
    pub bridge: Option<BridgeSpecs>,
    pub analysis: AnalysisConfig,
    pub site: SiteInputs,
    pub monitor: MonitorSettings,

    /// Per-parameter overrides keyed by code (`afc`, `BD`, ...).
    pub thresholds: BTreeMap<String, ThresholdOverride>,
}

/// Options for the periodic monitoring mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub interval_secs: u64,

    /// Run for this long, or until interrupted when unset.
    pub duration_secs: Option<u64>,

    /// File that always holds the latest status.
    pub output: Option<PathBuf>,

    /// Replaces `analysis.buffer_capacity` when set.
    pub buffer_capacity: Option<usize>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            duration_secs: None,
            output: None,
            buffer_capacity: None,
        }
    }
}

/// Fields to change on one parameter's standard threshold spec.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThresholdOverride {
    pub warning: Option<f64>,
    pub caution: Option<f64>,
    pub critical: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: Option<String>,
    pub inverted: Option<bool>,
}

impl ThresholdOverride {
    fn apply(&self, spec: &mut ThresholdSpec) {
        if let Some(v) = self.warning {
            spec.warning = v;
        }
        if let Some(v) = self.caution {
            spec.caution = v;
        }
        if let Some(v) = self.critical {
            spec.critical = v;
        }
        if let Some(v) = self.min {
            spec.min = v;
        }
        if let Some(v) = self.max {
            spec.max = v;
        }
        if let Some(unit) = &self.unit {
            spec.unit = Some(unit.clone());
        }
        if let Some(v) = self.inverted {
            spec.inverted = v;
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("STALWART")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        config
            .try_deserialize()
            .context("invalid configuration")
    }

    /// The standard threshold table with the configured overrides applied.
    ///
    /// Fails on an unknown parameter code or if the merged table violates
    /// its ordering invariants.
    pub fn threshold_table(&self) -> Result<ThresholdTable> {
        let mut table = ThresholdTable::standard();
        for (code, override_) in &self.thresholds {
            let parameter = Parameter::from_code(code)
                .ok_or_else(|| anyhow!("unknown parameter in thresholds: {}", code))?;
            let mut spec = table
                .get(parameter)
                .cloned()
                .unwrap_or_else(|| ThresholdSpec::new(0.0, 0.0, 0.0));
            override_.apply(&mut spec);
            table.insert(parameter, spec);
        }

        table.validate()?;
        Ok(table)
    }

    /// Analysis constants with the monitor's buffer override applied.
    pub fn analysis_config(&self) -> AnalysisConfig {
        let mut config = self.analysis.clone();
        if let Some(capacity) = self.monitor.buffer_capacity {
            config.buffer_capacity = capacity;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stalwart_engine::BridgeType;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let settings = Settings::default();
        assert!(settings.bridge.is_none());
        assert_eq!(settings.monitor.interval_secs, 1);
        assert_eq!(settings.analysis, AnalysisConfig::default());
        assert_eq!(settings.threshold_table().unwrap(), ThresholdTable::standard());
    }

    #[test]
    fn load_toml_file() {
        let file = write_config(
            ".toml",
            r#"
            [bridge]
            id = "GGB-001"
            name = "Golden Gate"
            bridge_type = "suspension"
            span_length = 1280.0

            [analysis]
            sampling_rate_hz = 50.0

            [site]
            wire_breaks = 3
            total_wires = 27572

            [monitor]
            interval_secs = 5
            buffer_capacity = 200

            [thresholds.bd]
            warning = 8.0
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        let bridge = settings.bridge.as_ref().unwrap();
        assert_eq!(bridge.id, "GGB-001");
        assert_eq!(bridge.bridge_type, BridgeType::Suspension);
        assert_eq!(bridge.design_life, 75);
        assert_eq!(settings.analysis.sampling_rate_hz, 50.0);
        assert_eq!(settings.analysis.yield_strain, 2000.0);
        assert_eq!(settings.site.wire_breaks, Some(3));
        assert_eq!(settings.monitor.interval_secs, 5);
        assert_eq!(settings.analysis_config().buffer_capacity, 200);

        let table = settings.threshold_table().unwrap();
        let bd = table.get(Parameter::Bd).unwrap();
        assert_eq!(bd.warning, 8.0);
        assert_eq!(bd.caution, 15.0);
    }

    #[test]
    fn load_json_file() {
        let file = write_config(
            ".json",
            r#"{ "bridge": { "bridge_id": "B-7", "bridge_type": "box-girder" } }"#,
        );
        let settings = Settings::load(Some(file.path())).unwrap();
        let bridge = settings.bridge.unwrap();
        assert_eq!(bridge.id, "B-7");
        assert_eq!(bridge.bridge_type, BridgeType::BoxGirder);
    }

    #[test]
    fn override_breaking_order_is_rejected() {
        let mut settings = Settings::default();
        settings.thresholds.insert(
            "CPII".into(),
            ThresholdOverride {
                critical: Some(0.95),
                ..Default::default()
            },
        );
        assert!(settings.threshold_table().is_err());
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let mut settings = Settings::default();
        settings
            .thresholds
            .insert("XYZ".into(), ThresholdOverride::default());
        let err = settings.threshold_table().unwrap_err();
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/stalwart.toml"))).is_err());
    }
}
