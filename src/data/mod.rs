//! Data processing for wearable telemetry.
//!
//! This module turns stored event documents and network samples into chart
//! series and summary statistics. Every function here is pure: no I/O, no
//! clock reads, no shared state.
//!
//! ## Submodules
//!
//! - [`normalize`]: Stored event documents into typed [`Measurement`]s
//! - [`window`]: Explicit and rolling window selection for one event type
//! - [`step`]: Stair-step projection with hold points
//! - [`merge`]: Occurrence series across several event types
//! - [`reconcile`]: Network log timestamp normalization and collision handling
//! - [`aggregate`]: Means, totals and network-type histogram
//! - [`summary`]: Per-user activity roll-up
//! - [`display`]: Axis, tooltip and byte-size labels
//!
//! ## Data Flow
//!
//! ```text
//! EventDocument ──▶ normalize_all() ──▶ Measurement
//!                                          │
//!                         ┌────────────────┴───────────────┐
//!                         ▼                                ▼
//!                  window::select()              window::select_recent()
//!                         │                                │
//!                         ▼                                ▼
//!                  step_points()                    merge_series()
//!                         │                                │
//!                         ▼                                ▼
//!                  ProjectedPoint                   OccurrencePoint
//!
//! RawNetworkLog ──▶ reconcile_logs() ──▶ NetworkLogRecord ──▶ aggregate() ──▶ NetworkStats
//! ```
//!
//! [`Measurement`]: wearwatch_types::Measurement

pub mod aggregate;
pub mod display;
pub mod merge;
pub mod normalize;
pub mod reconcile;
pub mod step;
pub mod summary;
pub mod window;

pub use aggregate::aggregate;
pub use display::{format_bytes, Labels};
pub use merge::{distinct_kinds, merge_series};
pub use normalize::{decode_event, normalize, normalize_all, split_event_key};
pub use reconcile::{
    network_types, parse_text_timestamp, reconcile_logs, reconcile_logs_with, CollisionPolicy,
    ReconcileOptions,
};
pub use step::step_points;
pub use summary::{sort_by_activity, summarize, UserSummary};
