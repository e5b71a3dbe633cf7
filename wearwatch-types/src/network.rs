//! Network quality log samples, raw and normalized.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{DataUsage, EpochMillis, Location, MeasurementValue};

/// Timestamp as it arrives from storage.
///
/// Live subcollection fetches return structured `{seconds, nanoseconds}`
/// pairs; the query service returns epoch-millisecond strings (often the
/// document key) or ISO-8601 dates. Some exports carry a bare number.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawTimestamp {
    /// Epoch milliseconds as a JSON number.
    Millis(i64),
    /// Epoch milliseconds or a date string.
    Text(String),
    /// Seconds plus sub-second nanoseconds.
    Structured {
        #[cfg_attr(feature = "serde", serde(alias = "_seconds"))]
        seconds: i64,
        #[cfg_attr(feature = "serde", serde(default, alias = "_nanoseconds"))]
        nanoseconds: i64,
    },
}

impl RawTimestamp {
    /// Build a structured timestamp from epoch milliseconds.
    pub const fn from_millis(ms: EpochMillis) -> Self {
        RawTimestamp::Structured {
            seconds: ms.div_euclid(1000),
            nanoseconds: ms.rem_euclid(1000) * 1_000_000,
        }
    }
}

/// One periodic network-quality sample as stored.
///
/// Every metric is optional; the reconciler defaults missing ones to zero.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RawNetworkLog {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub timestamp: Option<RawTimestamp>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub network_type: Option<String>,

    /// Signal strength in dBm.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub signal_strength: Option<f64>,

    /// Measured download speed in Mbps.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub download_speed: Option<f64>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub ping: Option<f64>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub jitter: Option<f64>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub snr: Option<f64>,

    /// Negotiated link speed in Mbps; zero when the radio does not report it.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub link_speed: Option<f64>,

    /// Battery usage with a unit suffix (`"3.5%"`), or occasionally a bare number.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub battery_usage: Option<MeasurementValue>,

    #[cfg_attr(
        feature = "serde",
        serde(rename = "data_usage", skip_serializing_if = "Option::is_none")
    )]
    pub data_usage: Option<DataUsage>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub is_charging: Option<bool>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub location: Option<Location>,
}

/// A network sample after timestamp normalization and flattening.
///
/// Within one reconciled series no two records share a timestamp.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkLogRecord {
    /// Milliseconds since the Unix epoch, never negative.
    pub timestamp: EpochMillis,
    pub signal_strength: f64,
    pub download_speed: f64,
    pub ping: f64,
    pub jitter: f64,
    pub snr: f64,
    pub link_speed: f64,
    /// Battery usage with the unit suffix stripped.
    pub battery_usage: f64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub is_charging: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub network_type: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub location: Option<Location>,
}

impl NetworkLogRecord {
    /// Speed used for summaries: link speed when the radio reports one,
    /// download speed otherwise.
    pub fn speed(&self) -> f64 {
        if self.link_speed > 0.0 {
            self.link_speed
        } else {
            self.download_speed
        }
    }
}

/// Summary statistics over a window of network samples.
///
/// Means over an empty window are 0.0; check `sample_count` before
/// presenting them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkStats {
    pub avg_signal: f64,
    pub avg_speed: f64,
    pub avg_ping: f64,
    pub total_rx: u64,
    pub total_tx: u64,
    pub type_histogram: Vec<NetworkTypeCount>,
    pub sample_count: usize,
}

impl NetworkStats {
    /// Check if the statistics were computed over zero samples.
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

/// Number of samples observed on one network type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkTypeCount {
    pub network_type: String,
    pub count: usize,
}
