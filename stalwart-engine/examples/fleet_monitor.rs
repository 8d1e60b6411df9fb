//! Example: monitoring a fleet from a channel
//!
//! A producer task pushes synthetic readings for two bridges into a
//! channel; the monitor analyzes each batch and the statuses are printed
//! as they arrive.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p stalwart-engine --example fleet_monitor
//! ```

use std::sync::Arc;
use std::time::Duration;

use stalwart_engine::{
    AnalysisProcessor, BridgeSpecs, BridgeType, Fleet, Measurement, MeasurementSource, Monitor,
    Output, SiteInputs,
};
use tokio::sync::mpsc;

#[derive(Debug)]
struct Feed {
    rx: mpsc::Receiver<Vec<Measurement>>,
}

impl MeasurementSource for Feed {
    fn poll(&mut self) -> Option<Vec<Measurement>> {
        self.rx.try_recv().ok()
    }

    fn description(&self) -> &str {
        "synthetic feed"
    }

    fn error(&self) -> Option<&str> {
        None
    }
}

fn synthetic_batch(structure: &str, step: u64, sag_mm: f64) -> Vec<Measurement> {
    (0..500)
        .flat_map(|i| {
            let t = i as f64 / 100.0;
            let ts = step * 10_000 + i * 10;
            let accel = 0.02 * (2.0 * std::f64::consts::PI * 1.15 * t).sin();
            let strain = 350.0 + 80.0 * (0.9 * t).sin();
            [
                Measurement::new("ACC-001", structure, ts, accel, "g"),
                Measurement::new("STR-001", structure, ts, strain, "ue"),
                Measurement::new("LVDT-001", structure, ts, sag_mm, "mm"),
            ]
        })
        .collect()
}

#[tokio::main]
async fn main() {
    let fleet = Arc::new(Fleet::new(Arc::new(AnalysisProcessor::standard())));
    fleet
        .register_with(
            BridgeSpecs::new("GGB-001", "Golden Gate", BridgeType::Suspension)
                .span_length(1280.0)
                .year_built(1937)
                .critical_flutter_speed(85.0),
            SiteInputs {
                wire_breaks: Some(3),
                total_wires: Some(27_572),
                ..SiteInputs::default()
            },
        )
        .unwrap();
    fleet
        .register(BridgeSpecs::new("I35-W", "Mississippi River", BridgeType::Truss).span_length(139.0))
        .unwrap();

    let (tx, rx) = mpsc::channel(16);
    let (output, mut statuses) = Output::channel(16);

    tokio::spawn(async move {
        for step in 0..5u64 {
            let mut batch = synthetic_batch("GGB-001", step, 2.0);
            batch.extend(synthetic_batch("I35-W", step, 3.0 + step as f64 * 1.5));
            if tx.send(batch).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    });

    let monitor = Monitor::builder(fleet)
        .output(output)
        .interval(Duration::from_millis(250))
        .build();
    let handle = monitor.start(Box::new(Feed { rx }));

    let deadline = tokio::time::sleep(Duration::from_secs(4));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            Some(status) = statuses.recv() => {
                println!(
                    "{:<8} health {:>5.1}  risk {:<9} alerts {}",
                    status.structure_id,
                    status.overall_health,
                    status.risk_level,
                    status.alerts.len()
                );
            }
            _ = &mut deadline => break,
        }
    }

    handle.shutdown().await;
}
