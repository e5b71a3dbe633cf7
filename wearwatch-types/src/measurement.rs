//! Decoded telemetry events.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::EpochMillis;

/// One observed state change on a device channel.
///
/// Created by the telemetry source and read-only to the engine. Timestamps
/// are unique-ish but not guaranteed unique, and raw order is unspecified
/// until the caller sorts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Milliseconds since the Unix epoch.
    pub timestamp: EpochMillis,

    /// Channel name, e.g. `wifi_connected` or `low_battery`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,

    /// Outcome suffix of the stored key (`Success` in `wifi_connected.Success`).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub outcome: Option<String>,

    /// Primary payload, copied verbatim from the stored record.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: MeasurementValue,

    /// Nested detail fields; empty when the record carried none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
}

impl Measurement {
    /// Create a measurement with empty attributes.
    pub fn new(timestamp: EpochMillis, kind: impl Into<String>, value: MeasurementValue) -> Self {
        Self {
            timestamp,
            kind: kind.into(),
            outcome: None,
            value,
            attributes: Attributes::default(),
        }
    }

    /// Set the outcome suffix.
    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Set the attribute block.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Check whether this measurement belongs to the given channel.
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

/// Event payload: boolean, numeric, or a domain-specific structure.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MeasurementValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<MeasurementValue>),
    Map(BTreeMap<String, MeasurementValue>),
}

impl MeasurementValue {
    /// Truthiness as the dashboard has always read it: null, false, zero,
    /// NaN and the empty string are false; everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            MeasurementValue::Null => false,
            MeasurementValue::Bool(b) => *b,
            MeasurementValue::Number(n) => *n != 0.0 && !n.is_nan(),
            MeasurementValue::Text(s) => !s.is_empty(),
            MeasurementValue::List(_) | MeasurementValue::Map(_) => true,
        }
    }

    /// Numeric reading of the payload, if it has one.
    ///
    /// Booleans map to 1.0/0.0 so state channels can be plotted directly.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasurementValue::Number(n) => Some(*n),
            MeasurementValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MeasurementValue::Null)
    }
}

impl From<bool> for MeasurementValue {
    fn from(b: bool) -> Self {
        MeasurementValue::Bool(b)
    }
}

impl From<f64> for MeasurementValue {
    fn from(n: f64) -> Self {
        MeasurementValue::Number(n)
    }
}

impl From<i64> for MeasurementValue {
    fn from(n: i64) -> Self {
        MeasurementValue::Number(n as f64)
    }
}

impl From<&str> for MeasurementValue {
    fn from(s: &str) -> Self {
        MeasurementValue::Text(s.into())
    }
}

impl From<String> for MeasurementValue {
    fn from(s: String) -> Self {
        MeasurementValue::Text(s)
    }
}

/// Optional detail fields attached to an event (the stored `measurements` object).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Attributes {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub location: Option<Location>,

    /// Heart rate readings captured with the event, in bpm.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "heart_rate", skip_serializing_if = "Vec::is_empty")
    )]
    pub heart_rate: Vec<f64>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub ssid: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub plugged: Option<bool>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub download_speed: Option<f64>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub signal_strength: Option<f64>,

    #[cfg_attr(
        feature = "serde",
        serde(rename = "data_usage", skip_serializing_if = "Option::is_none")
    )]
    pub data_usage: Option<DataUsage>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub ping: Option<f64>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub jitter: Option<f64>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub snr: Option<f64>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub link_speed: Option<f64>,

    /// Usually a string with a unit suffix (`"3.5%"`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub battery_usage: Option<MeasurementValue>,

    /// Firmware reports this as 0/1 on some builds and as a boolean on others.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub is_charging: Option<MeasurementValue>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub network_type: Option<String>,
}

impl Attributes {
    /// Check if no detail field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the event carries a real fix (latitude other than zero).
    pub fn has_location_fix(&self) -> bool {
        self.location.as_ref().is_some_and(|l| l.lat != 0.0)
    }
}

/// A geographic fix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub lat: f64,
    pub long: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub timestamp: Option<EpochMillis>,
}

/// Byte counters reported alongside network samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DataUsage {
    pub rx_bytes: f64,
    pub tx_bytes: f64,
}
