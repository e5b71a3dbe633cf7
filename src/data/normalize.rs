//! Event normalization: stored documents into typed measurements.
//!
//! A stored event document is keyed by its epoch-millisecond id and holds a
//! single `"<type>.<outcome>"` entry:
//!
//! ```text
//! "1700000000000": { "wifi_connected.Success": { "value": true, "measurements": {...} } }
//! ```
//!
//! Decoding fails closed. Anything that does not have exactly this shape is
//! dropped from the batch instead of failing it, so callers see undercounts
//! rather than errors.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use wearwatch_types::{Attributes, EpochMillis, Measurement, MeasurementValue};

use crate::error::MalformedRecord;
use crate::source::EventDocument;

/// The stored event entry under the composite key.
#[derive(Debug, Deserialize)]
struct EventEntry {
    #[serde(default)]
    value: MeasurementValue,
    #[serde(default)]
    measurements: Option<Attributes>,
}

/// Decode one stored event, reporting why it was rejected.
pub fn decode_event(id: &str, data: &Value) -> Result<Measurement, MalformedRecord> {
    let timestamp: EpochMillis = id
        .parse()
        .map_err(|_| MalformedRecord::Timestamp(id.to_string()))?;

    let entries = match data {
        Value::Object(map) => map,
        _ => return Err(MalformedRecord::KeyCount(0)),
    };
    if entries.len() != 1 {
        return Err(MalformedRecord::KeyCount(entries.len()));
    }
    let Some((key, entry)) = entries.iter().next() else {
        return Err(MalformedRecord::KeyCount(0));
    };

    let (kind, outcome) =
        split_event_key(key).ok_or_else(|| MalformedRecord::MissingType(key.clone()))?;

    let entry = EventEntry::deserialize(entry).map_err(|e| MalformedRecord::Entry {
        key: key.clone(),
        reason: e.to_string(),
    })?;

    Ok(Measurement {
        timestamp,
        kind: kind.to_string(),
        outcome: outcome.map(str::to_string),
        value: entry.value,
        attributes: entry.measurements.unwrap_or_default(),
    })
}

/// Decode one stored event, or `None` if it is malformed.
pub fn normalize(id: &str, data: &Value) -> Option<Measurement> {
    decode_event(id, data).ok()
}

/// Decode a batch of stored events, dropping malformed ones.
///
/// Output order follows input order.
pub fn normalize_all(documents: &[EventDocument]) -> Vec<Measurement> {
    let mut dropped = 0usize;
    let measurements: Vec<Measurement> = documents
        .iter()
        .filter_map(|doc| match decode_event(&doc.id, &doc.data) {
            Ok(m) => Some(m),
            Err(reason) => {
                dropped += 1;
                debug!(id = %doc.id, %reason, "Dropping malformed event");
                None
            }
        })
        .collect();

    debug!(
        decoded = measurements.len(),
        dropped, "Normalized event documents"
    );
    measurements
}

/// Split `"<type>.<outcome>"` at the first dot.
///
/// A key without a dot is all type. An empty type segment is rejected.
pub fn split_event_key(key: &str) -> Option<(&str, Option<&str>)> {
    let (kind, outcome) = match key.split_once('.') {
        Some((kind, outcome)) => (kind, Some(outcome).filter(|o| !o.is_empty())),
        None => (key, None),
    };
    if kind.is_empty() {
        return None;
    }
    Some((kind, outcome))
}
