use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use stalwart::{read_measurements, App, FileSource, Settings};
use stalwart_engine::{BridgeStatus, Output};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stalwart")]
#[command(about = "Structural health assessment for monitored bridges")]
struct Args {
    /// Path to a JSON array of measurements
    #[arg(short, long, default_value = "readings.json")]
    readings: PathBuf,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single cycle, or keep polling the readings file
    #[arg(short, long, value_enum, default_value_t = Mode::Analyze)]
    mode: Mode,

    /// Stop monitoring after this many seconds (default: until Ctrl-C)
    #[arg(short, long)]
    duration: Option<u64>,

    /// Polling interval in seconds for monitor mode
    #[arg(short, long)]
    interval: Option<u64>,

    /// Also write the latest status to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Analyze,
    Monitor,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(args.config.as_deref())?;
    let app = App::new(settings)?;

    match args.mode {
        Mode::Analyze => run_analyze(&app, &args),
        Mode::Monitor => run_monitor(&app, &args),
    }
}

/// Analyze the readings file once and print the result
fn run_analyze(app: &App, args: &Args) -> Result<()> {
    let measurements = read_measurements(&args.readings)?;
    let statuses = app.analyze(&measurements)?;

    if statuses.is_empty() {
        warn!(path = %args.readings.display(), "no bridge received readings");
    }

    let json = match statuses.as_slice() {
        [status] => serde_json::to_string_pretty(status)?,
        _ => serde_json::to_string_pretty(&statuses)?,
    };
    println!("{}", json);

    if let Some(path) = output_path(app, args) {
        std::fs::write(&path, &json)?;
        info!(path = %path.display(), "wrote status");
    }
    Ok(())
}

/// Poll the readings file on an interval until the duration elapses
fn run_monitor(app: &App, args: &Args) -> Result<()> {
    let monitor_settings = &app.settings().monitor;
    let interval = Duration::from_secs(args.interval.unwrap_or(monitor_settings.interval_secs).max(1));
    let duration = args.duration.or(monitor_settings.duration_secs).map(Duration::from_secs);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let (stdout_output, mut statuses) = Output::channel(64);
        let mut outputs = vec![stdout_output];
        if let Some(path) = output_path(app, args) {
            outputs.push(Output::file(path));
        }

        let printer = tokio::spawn(async move {
            while let Some(status) = statuses.recv().await {
                print_status_line(&status);
            }
        });

        let monitor = app.monitor(interval, outputs);
        info!(
            path = %args.readings.display(),
            interval_secs = interval.as_secs(),
            bridges = app.fleet().len(),
            "monitoring started"
        );
        let handle = monitor.start(app.monitored_source(FileSource::new(&args.readings)));

        match duration {
            Some(duration) => {
                tokio::select! {
                    _ = tokio::time::sleep(duration) => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            None => {
                tokio::signal::ctrl_c().await?;
            }
        }

        handle.shutdown().await;
        drop(monitor);
        let _ = printer.await;
        Ok::<_, anyhow::Error>(())
    })?;

    for status in app.fleet().statuses() {
        info!(
            structure = %status.structure_id,
            health = status.overall_health,
            risk = %status.risk_level,
            "final status"
        );
    }
    Ok(())
}

fn output_path(app: &App, args: &Args) -> Option<PathBuf> {
    args.output.clone().or_else(|| app.settings().monitor.output.clone())
}

fn print_status_line(status: &BridgeStatus) {
    match serde_json::to_string(status) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!(structure = %status.structure_id, "failed to serialize status: {}", e),
    }
}
