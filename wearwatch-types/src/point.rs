//! Chart points handed to the rendering layer.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::{EpochMillis, MeasurementValue};

/// One point of a projected step series.
///
/// Ephemeral: recomputed whenever the chart's window changes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedPoint {
    /// Axis label for the point.
    pub display: String,
    /// Instant the point is plotted at.
    pub raw_timestamp: EpochMillis,
    pub value: MeasurementValue,
}

/// One occurrence in a merged multi-type series.
///
/// `markers` holds one entry per requested type; exactly one of them is 1.
/// With serde the markers are flattened next to the timestamps, giving the
/// `{display, raw_timestamp, button_press: 1, notification_button_press: 0}`
/// shape bar charts expect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccurrencePoint {
    pub display: String,
    pub raw_timestamp: EpochMillis,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub markers: BTreeMap<String, u8>,
}

impl OccurrencePoint {
    /// Marker for a type; 0 when the type was not requested.
    pub fn marker(&self, kind: &str) -> u8 {
        self.markers.get(kind).copied().unwrap_or(0)
    }

    /// The type that occurred at this point.
    pub fn occurred(&self) -> Option<&str> {
        self.markers
            .iter()
            .find(|(_, &v)| v == 1)
            .map(|(k, _)| k.as_str())
    }
}
