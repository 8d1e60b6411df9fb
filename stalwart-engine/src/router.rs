//! Groups raw readings by sensor type.
//!
//! The sensor identifier prefix is the only coupling to the sensing
//! collaborator: `ACC-001` is an accelerometer, `STR-004` a strain gauge and
//! so on. Readings with any other prefix land in the unknown bucket and are
//! never handed to a metric calculator.

use std::fmt;

use stalwart_types::Measurement;
use tracing::{debug, warn};

/// Sensor category derived from the identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorKind {
    Vibration,
    Strain,
    Temperature,
    Corrosion,
    Displacement,
    Wind,
    Unknown,
}

impl SensorKind {
    /// Every routable kind, in prefix-matching order.
    pub const ROUTED: [SensorKind; 6] = [
        SensorKind::Vibration,
        SensorKind::Strain,
        SensorKind::Temperature,
        SensorKind::Corrosion,
        SensorKind::Displacement,
        SensorKind::Wind,
    ];

    /// Identifier prefix for this kind. Matching is case-sensitive.
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            SensorKind::Vibration => Some("ACC"),
            SensorKind::Strain => Some("STR"),
            SensorKind::Temperature => Some("TEMP"),
            SensorKind::Corrosion => Some("CORR"),
            SensorKind::Displacement => Some("LVDT"),
            SensorKind::Wind => Some("WIND"),
            SensorKind::Unknown => None,
        }
    }

    pub fn from_sensor_id(sensor_id: &str) -> Self {
        Self::ROUTED
            .into_iter()
            .find(|kind| kind.prefix().is_some_and(|p| sensor_id.starts_with(p)))
            .unwrap_or(SensorKind::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::Vibration => "vibration",
            SensorKind::Strain => "strain",
            SensorKind::Temperature => "temperature",
            SensorKind::Corrosion => "corrosion",
            SensorKind::Displacement => "displacement",
            SensorKind::Wind => "wind",
            SensorKind::Unknown => "unknown",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reading values grouped by sensor kind, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutedReadings {
    groups: [Vec<f64>; 7],
    /// Readings dropped for falling below the router's quality floor.
    pub rejected: usize,
    /// Newest timestamp among the accepted readings.
    pub latest_timestamp_ms: Option<u64>,
}

impl RoutedReadings {
    /// Values routed to `kind`.
    pub fn get(&self, kind: SensorKind) -> &[f64] {
        &self.groups[kind.index()]
    }

    pub fn vibration(&self) -> &[f64] {
        self.get(SensorKind::Vibration)
    }

    pub fn strain(&self) -> &[f64] {
        self.get(SensorKind::Strain)
    }

    pub fn temperature(&self) -> &[f64] {
        self.get(SensorKind::Temperature)
    }

    pub fn corrosion(&self) -> &[f64] {
        self.get(SensorKind::Corrosion)
    }

    pub fn displacement(&self) -> &[f64] {
        self.get(SensorKind::Displacement)
    }

    pub fn wind(&self) -> &[f64] {
        self.get(SensorKind::Wind)
    }

    /// Number of readings with an unrecognized prefix.
    pub fn unknown_count(&self) -> usize {
        self.get(SensorKind::Unknown).len()
    }

    /// Whether nothing usable was routed.
    pub fn is_empty(&self) -> bool {
        SensorKind::ROUTED.iter().all(|k| self.get(*k).is_empty())
    }

    fn push(&mut self, kind: SensorKind, value: f64) {
        self.groups[kind.index()].push(value);
    }
}

/// Classifies readings by sensor prefix.
#[derive(Debug, Clone, Default)]
pub struct MeasurementRouter {
    min_quality: f64,
}

impl MeasurementRouter {
    /// A router that keeps every reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop readings whose quality score is below `min_quality`.
    pub fn with_min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = min_quality.clamp(0.0, 1.0);
        self
    }

    pub fn min_quality(&self) -> f64 {
        self.min_quality
    }

    /// Group a batch of readings by sensor kind.
    pub fn route<'a, I>(&self, measurements: I) -> RoutedReadings
    where
        I: IntoIterator<Item = &'a Measurement>,
    {
        let mut routed = RoutedReadings::default();

        for m in measurements {
            if m.quality < self.min_quality {
                routed.rejected += 1;
                continue;
            }
            routed.push(SensorKind::from_sensor_id(&m.sensor_id), m.value);
            routed.latest_timestamp_ms = routed.latest_timestamp_ms.max(Some(m.timestamp_ms));
        }

        if routed.unknown_count() > 0 {
            warn!(
                count = routed.unknown_count(),
                "readings with unrecognized sensor prefix ignored"
            );
        }
        debug!(
            vibration = routed.vibration().len(),
            strain = routed.strain().len(),
            temperature = routed.temperature().len(),
            corrosion = routed.corrosion().len(),
            displacement = routed.displacement().len(),
            wind = routed.wind().len(),
            rejected = routed.rejected,
            "routed measurements"
        );

        routed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(sensor: &str, ts: u64, value: f64) -> Measurement {
        Measurement::new(sensor, "TEST-001", ts, value, "")
    }

    #[test]
    fn prefixes_map_to_kinds() {
        assert_eq!(SensorKind::from_sensor_id("ACC-001"), SensorKind::Vibration);
        assert_eq!(SensorKind::from_sensor_id("STR-12"), SensorKind::Strain);
        assert_eq!(SensorKind::from_sensor_id("TEMP-A"), SensorKind::Temperature);
        assert_eq!(SensorKind::from_sensor_id("CORR-1"), SensorKind::Corrosion);
        assert_eq!(SensorKind::from_sensor_id("LVDT-2"), SensorKind::Displacement);
        assert_eq!(SensorKind::from_sensor_id("WIND-N"), SensorKind::Wind);
        assert_eq!(SensorKind::from_sensor_id("GPS-1"), SensorKind::Unknown);
        assert_eq!(SensorKind::from_sensor_id("acc-001"), SensorKind::Unknown);
        assert_eq!(SensorKind::from_sensor_id(""), SensorKind::Unknown);
    }

    #[test]
    fn routes_in_arrival_order() {
        let batch = vec![
            reading("ACC-001", 10, 0.1),
            reading("STR-001", 11, 120.0),
            reading("ACC-002", 12, -0.2),
            reading("GPS-001", 13, 5.0),
            reading("WIND-001", 9, 14.0),
        ];
        let routed = MeasurementRouter::new().route(&batch);

        assert_eq!(routed.vibration(), &[0.1, -0.2]);
        assert_eq!(routed.strain(), &[120.0]);
        assert_eq!(routed.wind(), &[14.0]);
        assert!(routed.temperature().is_empty());
        assert_eq!(routed.unknown_count(), 1);
        assert_eq!(routed.latest_timestamp_ms, Some(13));
        assert!(!routed.is_empty());
    }

    #[test]
    fn quality_floor_drops_readings() {
        let batch = vec![
            reading("ACC-001", 1, 0.1).with_quality(0.9),
            reading("ACC-001", 2, 0.2).with_quality(0.3),
        ];
        let routed = MeasurementRouter::new().with_min_quality(0.5).route(&batch);
        assert_eq!(routed.vibration(), &[0.1]);
        assert_eq!(routed.rejected, 1);
        assert_eq!(routed.latest_timestamp_ms, Some(1));
    }

    #[test]
    fn empty_batch() {
        let routed = MeasurementRouter::new().route(&[] as &[Measurement]);
        assert!(routed.is_empty());
        assert_eq!(routed.latest_timestamp_ms, None);
    }

    #[test]
    fn only_unknown_is_empty() {
        let routed = MeasurementRouter::new().route(&[reading("XYZ", 1, 1.0)]);
        assert!(routed.is_empty());
    }
}
