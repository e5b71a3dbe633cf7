//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the harness around the engine: reading exports and
/// loading settings. The projection functions themselves never fail.
#[derive(Debug, Error)]
pub enum WearwatchError {
    /// Export file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export file is not valid JSON.
    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Export file is JSON but neither an object nor an array of documents.
    #[error("Unsupported document layout in {}", .0.display())]
    Layout(PathBuf),

    /// Settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A setting loaded but holds an unusable value.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// Why a stored event document was dropped during normalization.
///
/// Malformed records never fail a batch; this only feeds debug logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// The document id is not an integer timestamp.
    #[error("document id {0:?} is not an integer timestamp")]
    Timestamp(String),

    /// The document is not an object with exactly one event key.
    #[error("expected exactly one event key, found {0}")]
    KeyCount(usize),

    /// The event key has nothing before its first `.`.
    #[error("event key {0:?} has no type segment")]
    MissingType(String),

    /// The event entry does not have the stored `{value, measurements}` shape.
    #[error("event entry {key:?} did not decode: {reason}")]
    Entry { key: String, reason: String },
}
