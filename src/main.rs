use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wearwatch::data::{network_types, parse_text_timestamp};
use wearwatch::{
    aggregate, format_bytes, normalize_all, reconcile_logs_with, summarize, ChartPreset,
    ChartWindows, Clock, EpochMillis, FileSource, FixedClock, Measurement, Projector, Settings,
    SystemClock, TelemetrySource, TimeWindow,
};

#[derive(Parser, Debug)]
#[command(name = "wearwatch")]
#[command(about = "Project wearable telemetry exports into chart series")]
struct Args {
    /// Settings file (TOML). Defaults to ./wearwatch.toml if present.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Events export (JSON object keyed by document id, or array of {id, data})
    #[arg(short, long, global = true)]
    events: Option<PathBuf>,

    /// Network log export (JSON array, or object keyed by epoch-ms id)
    #[arg(short, long, global = true)]
    logs: Option<PathBuf>,

    /// Fix "now" for rolling charts (epoch ms or RFC 3339) instead of the wall clock
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Step series for one event type
    Project {
        /// Event type, e.g. wifi_connected
        #[arg(short = 't', long = "type")]
        kind: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Occurrence series across several event types
    Occurrences {
        /// Comma-separated event types
        #[arg(short = 't', long = "types", value_delimiter = ',', required = true)]
        kinds: Vec<String>,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// One of the dashboard's preset charts
    Chart {
        /// device-status, wifi-status, battery-level or button-presses
        id: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Reconciled network samples
    Logs {
        #[command(flatten)]
        window: WindowArgs,
        /// Only samples on this network type
        #[arg(long)]
        network_type: Option<String>,
        /// Keep at most this many of the most recent samples
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Network sample statistics
    Stats {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long)]
        network_type: Option<String>,
    },
    /// Activity summary for the user the events export belongs to
    Summary {
        #[arg(short, long, default_value = "user")]
        user: String,
    },
}

#[derive(ClapArgs, Debug)]
struct WindowArgs {
    /// Window start (epoch ms or RFC 3339)
    #[arg(long, requires = "end")]
    start: Option<String>,
    /// Window end (epoch ms or RFC 3339)
    #[arg(long, requires = "start")]
    end: Option<String>,
}

impl WindowArgs {
    /// Explicit window, or `None` for rolling mode.
    fn window(&self) -> Result<Option<TimeWindow>> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => {
                let window = TimeWindow::new(parse_instant(start)?, parse_instant(end)?);
                if window.is_empty() {
                    bail!("window start {} is after end {}", start, end);
                }
                Ok(Some(window))
            }
            _ => Ok(None),
        }
    }

    /// Log queries have no rolling mode; an open window takes everything.
    fn window_or_all(&self) -> Result<TimeWindow> {
        Ok(self.window()?.unwrap_or(TimeWindow::new(0, EpochMillis::MAX)))
    }
}

fn parse_instant(s: &str) -> Result<EpochMillis> {
    parse_text_timestamp(s).with_context(|| format!("unrecognised timestamp: {:?}", s))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("loading settings")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut source = FileSource::new(args.events.clone(), args.logs.clone());
    info!(source = source.description(), "Reading telemetry");

    match &args.now {
        Some(now) => run(&args, &settings, &mut source, FixedClock(parse_instant(now)?)),
        None => run(&args, &settings, &mut source, SystemClock),
    }
}

fn run<C: Clock>(
    args: &Args,
    settings: &Settings,
    source: &mut FileSource,
    clock: C,
) -> Result<()> {
    let projector = Projector::with_config(clock, settings.projection_config()?);

    match &args.command {
        Command::Project { kind, window } => {
            let measurements = load_measurements(args, source)?;
            let points = projector.project(&measurements, kind, window.window()?.as_ref());
            emit(&points)
        }
        Command::Occurrences { kinds, window } => {
            let measurements = load_measurements(args, source)?;
            let kinds: Vec<&str> = kinds.iter().map(String::as_str).collect();
            let points =
                projector.merge_occurrences(&measurements, &kinds, window.window()?.as_ref());
            emit(&points)
        }
        Command::Chart { id, window } => {
            let Some(preset) = ChartPreset::from_id(id) else {
                let known: Vec<_> = ChartPreset::ALL.iter().map(|p| p.id()).collect();
                bail!("unknown chart {:?}, expected one of {}", id, known.join(", "));
            };
            let measurements = load_measurements(args, source)?;
            let mut windows = ChartWindows::new();
            if let Some(w) = window.window()? {
                windows.set_window(preset.id(), w);
            }
            emit(&windows.project(&projector, &measurements, preset))
        }
        Command::Logs {
            window,
            network_type,
            limit,
        } => {
            require(args.logs.is_some(), "--logs")?;
            let raw = source.network_logs()?;
            let mut options = settings.reconcile_options();
            options.network_type = network_type.clone();
            if limit.is_some() {
                options.limit = *limit;
            }
            let records = reconcile_logs_with(&raw, &window.window_or_all()?, &options);
            info!(raw = raw.len(), reconciled = records.len(), "Reconciled logs");
            emit(&records)
        }
        Command::Stats {
            window,
            network_type,
        } => {
            require(args.logs.is_some(), "--logs")?;
            let raw = source.network_logs()?;
            let mut options = settings.reconcile_options();
            options.network_type = network_type.clone();
            let records = reconcile_logs_with(&raw, &window.window_or_all()?, &options);
            let stats = aggregate(&records);
            emit(&json!({
                "stats": stats,
                "network_types": network_types(&raw),
                "total_rx": format_bytes(stats.total_rx),
                "total_tx": format_bytes(stats.total_tx),
            }))
        }
        Command::Summary { user } => {
            let measurements = load_measurements(args, source)?;
            emit(&summarize(user.clone(), &measurements))
        }
    }
}

fn require(present: bool, flag: &str) -> Result<()> {
    if !present {
        bail!("this command needs {}", flag);
    }
    Ok(())
}

fn load_measurements(args: &Args, source: &mut FileSource) -> Result<Vec<Measurement>> {
    require(args.events.is_some(), "--events")?;
    let docs = source.events()?;
    let measurements = normalize_all(&docs);
    info!(
        documents = docs.len(),
        measurements = measurements.len(),
        "Normalized events"
    );
    Ok(measurements)
}

fn emit<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    io::Write::write_all(&mut out, b"\n")?;
    Ok(())
}
