//! File-based telemetry source.
//!
//! Reads JSON exports of a user's `EVENTS` and `NETWORK_LOGS` collections.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use wearwatch_types::RawNetworkLog;

use super::documents::{keyed_log, EventDocument};
use super::TelemetrySource;
use crate::error::WearwatchError;

/// A telemetry source backed by exported JSON files.
///
/// Either file may be omitted; the corresponding collection is then empty.
///
/// Event exports are an object mapping document id to document body, or an
/// array of `{"id": ..., "data": {...}}`. Log exports are an array of log
/// documents, or an object keyed by epoch-millisecond document id.
#[derive(Debug, Clone)]
pub struct FileSource {
    events_path: Option<PathBuf>,
    logs_path: Option<PathBuf>,
    description: String,
}

impl FileSource {
    /// Create a source reading from the given export files.
    pub fn new(events_path: Option<PathBuf>, logs_path: Option<PathBuf>) -> Self {
        let describe = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        let description = format!(
            "file: events={} logs={}",
            describe(&events_path),
            describe(&logs_path)
        );
        Self {
            events_path,
            logs_path,
            description,
        }
    }

    /// Source with only an events export.
    pub fn events_only<P: AsRef<Path>>(path: P) -> Self {
        Self::new(Some(path.as_ref().to_path_buf()), None)
    }

    /// Source with only a network log export.
    pub fn logs_only<P: AsRef<Path>>(path: P) -> Self {
        Self::new(None, Some(path.as_ref().to_path_buf()))
    }

    pub fn events_path(&self) -> Option<&Path> {
        self.events_path.as_deref()
    }

    pub fn logs_path(&self) -> Option<&Path> {
        self.logs_path.as_deref()
    }
}

impl TelemetrySource for FileSource {
    fn events(&mut self) -> Result<Vec<EventDocument>, WearwatchError> {
        let Some(path) = &self.events_path else {
            return Ok(Vec::new());
        };

        let docs = match read_json(path)? {
            Value::Object(map) => map
                .into_iter()
                .map(|(id, data)| EventDocument::new(id, data))
                .collect(),
            Value::Array(items) => items.into_iter().filter_map(event_from_item).collect(),
            _ => return Err(WearwatchError::Layout(path.clone())),
        };

        Ok(docs)
    }

    fn network_logs(&mut self) -> Result<Vec<RawNetworkLog>, WearwatchError> {
        let Some(path) = &self.logs_path else {
            return Ok(Vec::new());
        };

        let logs = match read_json(path)? {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .filter_map(|(i, item)| match serde_json::from_value(item) {
                    Ok(log) => Some(log),
                    Err(e) => {
                        debug!(index = i, error = %e, "Skipping undecodable network log");
                        None
                    }
                })
                .collect(),
            Value::Object(map) => map
                .into_iter()
                .filter_map(|(key, body)| match keyed_log(&key, body) {
                    Ok(log) => Some(log),
                    Err(e) => {
                        debug!(key = %key, error = %e, "Skipping undecodable network log");
                        None
                    }
                })
                .collect(),
            _ => return Err(WearwatchError::Layout(path.clone())),
        };

        Ok(logs)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

fn read_json(path: &Path) -> Result<Value, WearwatchError> {
    let content = fs::read_to_string(path).map_err(|source| WearwatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| WearwatchError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Array-form event item: `{"id": "...", "data": {...}}`, id may be a number.
fn event_from_item(item: Value) -> Option<EventDocument> {
    let Value::Object(mut obj) = item else {
        debug!("Skipping non-object event item");
        return None;
    };
    let id = match obj.remove("id") {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            debug!("Skipping event item without id");
            return None;
        }
    };
    let data = obj.remove("data").unwrap_or(Value::Null);
    Some(EventDocument::new(id, data))
}
