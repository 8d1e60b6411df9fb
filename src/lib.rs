//! # stalwart
//!
//! Command-line front end and library glue for the stalwart bridge health
//! engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          stalwart                            │
//! │  ┌──────────┐    ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │ settings │───▶│   app   │───▶│  Fleet  │───▶│  Output  │  │
//! │  │ (config) │    │(wiring) │    │(engine) │    │file/chan │  │
//! │  └──────────┘    └────▲────┘    └─────────┘    └──────────┘  │
//! │                       │                                      │
//! │                  ┌────┴────┐                                 │
//! │                  │ source  │◀── FileSource | ChannelSource   │
//! │                  └─────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`settings`]**: layered configuration (file, then `STALWART_*`
//!   environment variables) for the bridge, analysis constants, site data,
//!   threshold overrides and the monitor
//! - **[`source`]**: measurement sources for the monitoring loop
//! - **[`app`]**: builds the fleet from settings and runs cycles
//!
//! ## Usage
//!
//! ```bash
//! # One cycle over a batch, status printed as JSON
//! stalwart --readings readings.json --config bridge.toml
//!
//! # Re-analyze whenever the file changes, for ten minutes
//! stalwart --readings readings.json --mode monitor --duration 600 --output status.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use stalwart::{App, Settings};
//! use stalwart_engine::Measurement;
//!
//! let app = App::new(Settings::default()).unwrap();
//! let statuses = app
//!     .analyze(&[Measurement::new("LVDT-001", "GGB-001", 1_000, 2.5, "mm")])
//!     .unwrap();
//! assert_eq!(statuses[0].structure_id, "GGB-001");
//! ```

pub mod app;
pub mod settings;
pub mod source;

pub use app::App;
pub use settings::{MonitorSettings, Settings, ThresholdOverride};
pub use source::{read_measurements, ChannelSource, FileSource, MeasurementSource};
