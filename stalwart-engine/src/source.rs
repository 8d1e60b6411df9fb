//! Measurement supplier abstraction.

use std::fmt::Debug;

use stalwart_types::Measurement;

/// Supplies batches of readings to the monitoring loop.
///
/// Implementations wrap whatever actually produces readings: a file written
/// by an acquisition system, a channel fed by a message bus subscriber, a
/// replay of recorded data.
pub trait MeasurementSource: Send + Debug {
    /// Poll for a new batch.
    ///
    /// Returns `Some(batch)` when new readings are available and `None`
    /// otherwise. Must not block.
    fn poll(&mut self) -> Option<Vec<Measurement>>;

    /// Human-readable description of where readings come from.
    fn description(&self) -> &str;

    /// Error message from the last poll, if it failed.
    fn error(&self) -> Option<&str>;
}
