//! Storage-side input for the projection engine.
//!
//! The engine never queries the document store itself. A [`TelemetrySource`]
//! hands it already-fetched documents; the harness ships a file-backed one
//! that reads JSON exports.

mod documents;
mod file;

pub use documents::{keyed_log, EventDocument};
pub use file::FileSource;

use std::fmt::Debug;

use wearwatch_types::RawNetworkLog;

use crate::error::WearwatchError;

/// Trait for fetching a user's raw telemetry snapshot.
///
/// Each call returns the full collection as of now; there are no live
/// subscription semantics.
///
/// # Example
///
/// ```no_run
/// use wearwatch::{FileSource, TelemetrySource};
///
/// let mut source = FileSource::events_only("events.json");
/// let docs = source.events()?;
/// println!("{} event documents from {}", docs.len(), source.description());
/// # Ok::<(), wearwatch::WearwatchError>(())
/// ```
pub trait TelemetrySource: Debug {
    /// Raw event documents, in storage order (file order for exports).
    fn events(&mut self) -> Result<Vec<EventDocument>, WearwatchError>;

    /// Raw network log documents, in storage order (file order for exports).
    fn network_logs(&mut self) -> Result<Vec<RawNetworkLog>, WearwatchError>;

    /// Human-readable description of where the data comes from.
    fn description(&self) -> &str;
}
