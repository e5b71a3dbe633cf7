//! Stored document shapes.
//!
//! These mirror what the document store returns: per-user `EVENTS` documents
//! keyed by an epoch-millisecond id, and `NETWORK_LOGS` documents whose
//! timestamp is either a field or the document key itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use wearwatch_types::{RawNetworkLog, RawTimestamp};

/// One raw event document.
///
/// `data` holds a single `"<type>.<outcome>"` key whose value is the event
/// entry `{value, measurements?}`. Nothing is validated here; the
/// normalizer decides what survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDocument {
    /// Document id: epoch milliseconds as a string.
    pub id: String,
    pub data: Value,
}

impl EventDocument {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Decode a network log stored under a document key.
///
/// The query service keys logs by their epoch-millisecond timestamp and does
/// not always repeat it in the body; the key fills that gap.
pub fn keyed_log(key: &str, body: Value) -> Result<RawNetworkLog, serde_json::Error> {
    let mut log: RawNetworkLog = serde_json::from_value(body)?;
    if log.timestamp.is_none() {
        log.timestamp = Some(RawTimestamp::Text(key.to_string()));
    }
    Ok(log)
}
