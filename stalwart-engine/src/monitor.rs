//! Periodic monitoring loop.

use std::sync::Arc;
use std::time::Duration;

use stalwart_types::BridgeStatus;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::fleet::Fleet;
use crate::output::Output;
use crate::source::MeasurementSource;

/// Polls a measurement source on an interval, runs a cycle for every bridge
/// that received readings, and emits each new status to the outputs.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use stalwart_engine::{AnalysisProcessor, Fleet, Monitor, Output};
///
/// # async fn run(source: Box<dyn stalwart_engine::MeasurementSource>) {
/// let fleet = Arc::new(Fleet::new(Arc::new(AnalysisProcessor::standard())));
/// let monitor = Monitor::builder(fleet)
///     .output(Output::file("status.json"))
///     .interval(Duration::from_secs(5))
///     .build();
///
/// let handle = monitor.start(source);
/// tokio::time::sleep(Duration::from_secs(60)).await;
/// handle.shutdown().await;
/// # }
/// ```
#[derive(Debug)]
pub struct Monitor {
    fleet: Arc<Fleet>,
    outputs: Arc<Vec<Output>>,
    interval: Duration,
}

impl Monitor {
    pub fn builder(fleet: Arc<Fleet>) -> MonitorBuilder {
        MonitorBuilder::new(fleet)
    }

    pub fn fleet(&self) -> &Arc<Fleet> {
        &self.fleet
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the loop in a background task.
    ///
    /// The first poll happens immediately. Returns a handle that stops the
    /// loop; cycles never overlap, the loop only checks for a stop request
    /// between them.
    pub fn start(&self, mut source: Box<dyn MeasurementSource>) -> MonitorHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let fleet = self.fleet.clone();
        let outputs = self.outputs.clone();
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        run_cycle(&fleet, &outputs, source.as_mut()).await;
                    }
                    // A dropped handle closes the channel and also stops the loop
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        MonitorHandle { stop_tx, task }
    }

    /// Poll once and emit the resulting statuses.
    pub async fn run_once(&self, source: &mut dyn MeasurementSource) -> Vec<BridgeStatus> {
        run_cycle(&self.fleet, &self.outputs, source).await
    }
}

async fn run_cycle(
    fleet: &Fleet,
    outputs: &[Output],
    source: &mut dyn MeasurementSource,
) -> Vec<BridgeStatus> {
    let Some(batch) = source.poll() else {
        if let Some(err) = source.error() {
            error!(source = source.description(), "poll failed: {}", err);
        }
        return Vec::new();
    };
    debug!(source = source.description(), readings = batch.len(), "polled batch");

    let statuses = match fleet.ingest(&batch) {
        Ok(statuses) => statuses,
        Err(e) => {
            error!(source = source.description(), "analysis cycle rejected: {}", e);
            return Vec::new();
        }
    };

    for status in &statuses {
        for output in outputs {
            if let Err(e) = output.emit(status).await {
                error!(structure = %status.structure_id, "failed to emit status: {}", e);
            }
        }
    }
    statuses
}

/// Builder for a [`Monitor`].
#[derive(Debug)]
pub struct MonitorBuilder {
    fleet: Arc<Fleet>,
    outputs: Vec<Output>,
    interval: Option<Duration>,
}

impl MonitorBuilder {
    pub fn new(fleet: Arc<Fleet>) -> Self {
        Self {
            fleet,
            outputs: Vec::new(),
            interval: None,
        }
    }

    /// Add an output. Every status goes to every output.
    pub fn output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    /// Set the polling interval. Defaults to 1 second.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn build(self) -> Monitor {
        Monitor {
            fleet: self.fleet,
            outputs: Arc::new(self.outputs),
            interval: self.interval.unwrap_or(Duration::from_secs(1)),
        }
    }
}

/// Handle for stopping a running monitor.
///
/// Dropping the handle stops the loop as well.
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Ask the loop to stop after the current cycle.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }

    /// Stop the loop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}
