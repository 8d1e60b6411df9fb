//! Destinations for bridge status records.

use std::path::PathBuf;

use stalwart_types::BridgeStatus;

/// Where the monitor sends each new status.
#[derive(Debug)]
pub enum Output {
    /// Write the status to a JSON file.
    ///
    /// The file is overwritten with each status, so it always holds the
    /// latest one.
    File(PathBuf),

    /// Send statuses through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<BridgeStatus>),
}

impl Output {
    /// Create a file output.
    ///
    /// ```rust
    /// use stalwart_engine::Output;
    ///
    /// let output = Output::file("status.json");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a channel output and return both the output and receiver.
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<BridgeStatus>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Emit a status to this output.
    #[cfg(feature = "tokio")]
    pub(crate) async fn emit(&self, status: &BridgeStatus) -> std::io::Result<()> {
        match self {
            Output::File(path) => {
                let json = serde_json::to_string_pretty(status)?;
                tokio::fs::write(path, json).await?;
            }
            Output::Channel(tx) => {
                // Best effort, never block the monitoring loop
                let _ = tx.try_send(status.clone());
            }
        }
        Ok(())
    }
}
