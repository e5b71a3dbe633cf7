//! # wearwatch
//!
//! A telemetry-to-timeseries projection engine for wearable safety device
//! dashboards.
//!
//! Wearables report sparse, irregular state changes ("wifi connected",
//! "off body", "battery at 42%") and periodic network-quality samples. This
//! crate turns those into gap-filled, windowed series ready for step and bar
//! charts, and reduces network samples to summary statistics.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Harness                            │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌─────────┐  │
//! │  │ source  │───▶│   data   │───▶│  engine  │───▶│ charts  │  │
//! │  │ (input) │    │(normalize│    │(Projector│    │(windows,│  │
//! │  └─────────┘    │ reconcile│    │  + Clock)│    │ presets)│  │
//! │       ▲         │ aggregate│    └──────────┘    └─────────┘  │
//! │       │         └──────────┘                                 │
//! │  FileSource (JSON exports)        settings ◀── TOML + env    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: [`TelemetrySource`] trait and the JSON-export [`FileSource`]
//! - **[`data`]**: Pure processing: normalization, window selection, step
//!   projection, occurrence merging, log reconciliation, aggregation
//! - **[`engine`]**: [`Projector`], which composes the data steps with an
//!   injected [`Clock`]
//! - **[`charts`]**: Per-chart windows and the dashboard's chart presets
//! - **[`settings`]**: Layered configuration for the CLI
//!
//! ## Example
//!
//! ```
//! use wearwatch::{normalize_all, EventDocument, FixedClock, Projector, TimeWindow};
//! use serde_json::json;
//!
//! let docs = vec![
//!     EventDocument::new("1000", json!({"wifi_connected.Success": {"value": true}})),
//!     EventDocument::new("5000", json!({"wifi_connected.Success": {"value": false}})),
//! ];
//! let measurements = normalize_all(&docs);
//!
//! let projector = Projector::new(FixedClock(10_000));
//! let points = projector.project(&measurements, "wifi_connected", Some(&TimeWindow::new(0, 6000)));
//!
//! let raw: Vec<_> = points.iter().map(|p| p.raw_timestamp).collect();
//! assert_eq!(raw, vec![1000, 4999, 5000]);
//! ```
//!
//! ### Network logs
//!
//! ```
//! use wearwatch::{aggregate, reconcile_logs, RawNetworkLog, RawTimestamp, TimeWindow};
//!
//! let logs = vec![
//!     RawNetworkLog {
//!         timestamp: Some(RawTimestamp::Text("100".into())),
//!         signal_strength: Some(-70.0),
//!         ..Default::default()
//!     },
//!     RawNetworkLog {
//!         timestamp: Some(RawTimestamp::Text("100".into())),
//!         signal_strength: Some(-80.0),
//!         ..Default::default()
//!     },
//! ];
//!
//! let records = reconcile_logs(&logs, &TimeWindow::new(0, 1000));
//! assert_eq!(records[0].timestamp, 100);
//! assert_eq!(records[1].timestamp, 101);
//!
//! let stats = aggregate(&records);
//! assert_eq!(stats.avg_signal, -75.0);
//! ```

pub mod charts;
pub mod clock;
pub mod data;
pub mod engine;
pub mod error;
pub mod settings;
pub mod source;

pub use charts::{ChartPreset, ChartSeries, ChartWindows, PlotPoint};
pub use clock::{Clock, FixedClock, SystemClock};
pub use data::{
    aggregate, format_bytes, network_types, normalize, normalize_all, reconcile_logs,
    reconcile_logs_with, sort_by_activity, summarize, CollisionPolicy, Labels, ReconcileOptions,
    UserSummary,
};
pub use engine::{ProjectionConfig, Projector};
pub use error::{MalformedRecord, WearwatchError};
pub use settings::Settings;
pub use source::{EventDocument, FileSource, TelemetrySource};

pub use wearwatch_types::{
    channels, EpochMillis, Measurement, MeasurementValue, NetworkLogRecord, NetworkStats,
    OccurrencePoint, ProjectedPoint, RawNetworkLog, RawTimestamp, TimeWindow, DAY_MS, HOUR_MS,
};
