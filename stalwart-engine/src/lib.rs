//! # stalwart-engine
//!
//! Scoring engine for bridge structural health monitoring.
//!
//! Turns batches of raw sensor readings into nine condition parameters,
//! classifies each against a threshold table, and rolls them up into a
//! health score, a risk level and a list of alerts.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use stalwart_engine::{AnalysisProcessor, BridgeSpecs, BridgeType, Fleet, Measurement, Parameter};
//!
//! let fleet = Fleet::new(Arc::new(AnalysisProcessor::standard()));
//! fleet
//!     .register(BridgeSpecs::new("GGB-001", "Golden Gate", BridgeType::Suspension))
//!     .unwrap();
//!
//! let batch = vec![
//!     Measurement::new("LVDT-001", "GGB-001", 1_000, 2.5, "mm"),
//!     Measurement::new("TEMP-001", "GGB-001", 1_000, 18.0, "C"),
//! ];
//! let statuses = fleet.ingest(&batch).unwrap();
//!
//! let status = &statuses[0];
//! assert!((status.parameter(Parameter::Bd).unwrap() - 10.0).abs() < 1e-9);
//! assert!((0.0..=100.0).contains(&status.overall_health));
//! ```
//!
//! ## Layers
//!
//! - [`metrics`]: the nine calculators, pure functions of their inputs
//! - [`AnalysisProcessor`]: one stateless cycle from readings to status
//! - [`Bridge`] and [`Fleet`]: per-structure state and a shared registry
//! - [`Monitor`]: periodic polling loop (requires the `tokio` feature)
//!
//! ## Features
//!
//! - `tokio` (default): the monitoring loop and async outputs

pub mod alerts;
mod bridge;
pub mod buffer;
mod config;
mod error;
pub mod estimators;
pub mod features;
mod fleet;
pub mod health;
pub mod metrics;
#[cfg(feature = "tokio")]
mod monitor;
mod output;
mod processor;
pub mod rainflow;
pub mod risk;
pub mod router;
mod source;
mod specs;

pub use bridge::Bridge;
pub use buffer::RingBuffer;
pub use config::{nominal, AnalysisConfig, SiteInputs};
pub use error::{AnalysisError, Result};
pub use fleet::{BridgeHandle, Fleet};
pub use metrics::MetricInput;
#[cfg(feature = "tokio")]
pub use monitor::{Monitor, MonitorBuilder, MonitorHandle};
pub use output::Output;
pub use processor::{AnalysisProcessor, Assessment};
pub use router::{MeasurementRouter, RoutedReadings, SensorKind};
pub use source::MeasurementSource;
pub use specs::{BridgeSpecs, BridgeType, Material, MaterialProperties};

// Re-export types for convenience
pub use stalwart_types::{
    current_timestamp_ms, Alert, AlertLevel, BridgeStatus, Measurement, MetricResult, MetricStatus,
    Parameter, ParseError, RiskLevel, ThresholdError, ThresholdSpec, ThresholdTable,
};
