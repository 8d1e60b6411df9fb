//! Measurement sources for the monitoring loop.
//!
//! Both sources implement [`MeasurementSource`] from the engine: the loop
//! calls `poll()` once per interval and analyzes whatever comes back.

mod channel;
mod file;

pub use channel::ChannelSource;
pub use file::{read_measurements, FileSource};

pub use stalwart_engine::MeasurementSource;
