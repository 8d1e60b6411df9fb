//! Channel-based measurement source.
//!
//! Receives batches pushed by an in-process producer, such as a data
//! acquisition task or a message bus subscriber.

use tokio::sync::mpsc::{self, error::TryRecvError};

use stalwart_types::Measurement;

use super::MeasurementSource;

/// A source fed through an mpsc channel.
///
/// Each poll drains every batch queued since the last one and returns them
/// as a single batch.
///
/// # Example
///
/// ```
/// use stalwart::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("daq://deck-north", 16);
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<Vec<Measurement>>,
    description: String,
    closed: bool,
}

impl ChannelSource {
    /// Wrap the receiving end of a channel.
    pub fn new(receiver: mpsc::Receiver<Vec<Measurement>>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            closed: false,
        }
    }

    /// Create a bounded channel and return its sender with the source.
    pub fn create(source_description: &str, buffer: usize) -> (mpsc::Sender<Vec<Measurement>>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx, source_description))
    }
}

impl MeasurementSource for ChannelSource {
    fn poll(&mut self) -> Option<Vec<Measurement>> {
        let mut drained: Option<Vec<Measurement>> = None;
        loop {
            match self.receiver.try_recv() {
                Ok(batch) => drained.get_or_insert_with(Vec::new).extend(batch),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
        drained
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.closed.then_some("channel closed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ts: u64) -> Measurement {
        Measurement::new("ACC-001", "GGB-001", ts, 0.01, "g")
    }

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test", 8);
        assert_eq!(source.description(), "channel: test");

        // Nothing queued yet
        assert!(source.poll().is_none());

        tx.try_send(vec![reading(1), reading(2)]).unwrap();
        tx.try_send(vec![reading(3)]).unwrap();

        let batch = source.poll().unwrap();
        let timestamps: Vec<u64> = batch.iter().map(|m| m.timestamp_ms).collect();
        assert_eq!(timestamps, vec![1, 2, 3]);
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_channel_source_reports_closed() {
        let (tx, mut source) = ChannelSource::create("test", 8);
        tx.try_send(vec![reading(1)]).unwrap();
        drop(tx);

        // Queued batches are still delivered
        assert_eq!(source.poll().unwrap().len(), 1);
        assert!(source.poll().is_none());
        assert_eq!(source.error(), Some("channel closed"));
    }
}
