//! Raw sensor readings.

/// A single reading from a sensor mounted on a structure.
///
/// Produced by the sensing collaborator and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Sensor identifier. Its prefix ("ACC", "STR", "TEMP", ...) decides how
    /// the reading is routed.
    pub sensor_id: String,

    /// Identifier of the structure the sensor belongs to.
    #[cfg_attr(feature = "serde", serde(alias = "bridge_id"))]
    pub structure_id: String,

    /// Unix timestamp in milliseconds when the reading was taken.
    pub timestamp_ms: u64,

    pub value: f64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: String,

    /// Quality score in `[0, 1]`, 1 being excellent.
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_quality", deserialize_with = "clamped_quality")
    )]
    pub quality: f64,
}

#[cfg(feature = "serde")]
fn default_quality() -> f64 {
    1.0
}

#[cfg(feature = "serde")]
fn clamped_quality<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let quality = <f64 as serde::Deserialize>::deserialize(deserializer)?;
    Ok(quality.clamp(0.0, 1.0))
}

impl Measurement {
    /// Create a reading with full quality.
    pub fn new(
        sensor_id: impl Into<String>,
        structure_id: impl Into<String>,
        timestamp_ms: u64,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            structure_id: structure_id.into(),
            timestamp_ms,
            value,
            unit: unit.into(),
            quality: 1.0,
        }
    }

    /// Set the quality score, clamped to `[0, 1]`.
    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality.clamp(0.0, 1.0);
        self
    }
}
