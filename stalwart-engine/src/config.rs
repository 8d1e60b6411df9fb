//! Analysis parameters and non-sensor site data.

use serde::{Deserialize, Serialize};

use crate::buffer;
use crate::estimators;

/// Constants that steer one analysis cycle.
///
/// All fields have serde defaults, so a partial configuration file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sampling rate of the vibration channel (Hz).
    pub sampling_rate_hz: f64,

    /// Frequency of the healthy structure (Hz). Without one, the current
    /// estimate is its own baseline and FFD reads zero.
    pub baseline_frequency_hz: Option<f64>,
    pub baseline_damping: f64,
    pub baseline_decay_time_s: f64,

    /// Temperature at which the baseline frequency was measured (°C).
    pub reference_temperature_c: Option<f64>,

    /// Yield strain for the simplified fatigue ratio (µε).
    pub yield_strain: f64,
    /// Fatigue cycles over the design life.
    pub design_cycles: f64,

    pub design_amplitude: f64,
    pub design_damping: f64,
    pub design_frequency_hz: f64,

    /// Used when the bridge specs do not state a flutter speed (m/s).
    pub critical_flutter_speed: f64,

    /// Rated bearing displacement (mm).
    pub displacement_capacity_mm: f64,

    /// Readings with a lower quality score are ignored.
    pub min_quality: f64,

    /// Readings kept per sensor in the rolling log.
    pub buffer_capacity: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: 100.0,
            baseline_frequency_hz: None,
            baseline_damping: estimators::FALLBACK_DAMPING,
            baseline_decay_time_s: estimators::FALLBACK_DECAY_TIME_S,
            reference_temperature_c: None,
            yield_strain: 2000.0,
            design_cycles: 1e8,
            design_amplitude: 0.1,
            design_damping: 0.024,
            design_frequency_hz: 1.2,
            critical_flutter_speed: 70.0,
            displacement_capacity_mm: 25.0,
            min_quality: 0.0,
            buffer_capacity: buffer::DEFAULT_CAPACITY,
        }
    }
}

/// Inspection data that no sensor reports.
///
/// Every field is optional. A metric that needs a missing value falls back
/// to a nominal default at reduced confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInputs {
    pub wire_breaks: Option<u32>,
    pub total_wires: Option<u32>,
    /// Chloride at rebar depth (% by mass of cement).
    pub chloride_concentration: Option<f64>,
    /// Carbonation front depth (mm).
    pub carbonation_depth: Option<f64>,
    /// Concrete cover over reinforcement (mm).
    pub concrete_cover: Option<f64>,
    /// Joint expansion observed over the temperature swing (mm).
    pub measured_expansion: Option<f64>,
    /// Joint expansion the design predicts for the same swing (mm).
    pub expected_expansion: Option<f64>,
    /// Seasonal temperature swing (°C).
    pub temperature_delta: Option<f64>,
    /// Peak vertical deck amplitude (m).
    pub vertical_amplitude: Option<f64>,
    /// Bearing displacement (mm).
    pub bearing_displacement: Option<f64>,
}

/// Stand-ins used when neither a sensor nor the site data provides a value.
pub mod nominal {
    pub const WIND_SPEED: f64 = 15.0;
    pub const VERTICAL_AMPLITUDE: f64 = 0.05;
    pub const DAMPING_RATIO: f64 = 0.02;
    pub const FREQUENCY_HZ: f64 = 1.2;
    pub const TEMPERATURE_DELTA: f64 = 25.0;
    pub const MEASURED_EXPANSION: f64 = 150.0;
    pub const EXPECTED_EXPANSION: f64 = 200.0;
    pub const CHLORIDE_CONCENTRATION: f64 = 0.25;
    pub const BEARING_DISPLACEMENT: f64 = 8.5;
}
