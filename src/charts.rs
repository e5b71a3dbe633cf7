//! Per-chart window state and the dashboard's chart presets.

use std::collections::HashMap;

use serde::Serialize;

use wearwatch_types::{
    channels, EpochMillis, Measurement, MeasurementValue, OccurrencePoint, ProjectedPoint,
    TimeWindow,
};

use crate::clock::Clock;
use crate::engine::Projector;

/// The charts on a user's detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartPreset {
    /// Worn or off-body.
    DeviceStatus,
    /// Wifi connected or not.
    WifiStatus,
    /// Reported battery level.
    BatteryLevel,
    /// Button and notification-button presses.
    ButtonPresses,
}

impl ChartPreset {
    pub const ALL: [ChartPreset; 4] = [
        ChartPreset::DeviceStatus,
        ChartPreset::WifiStatus,
        ChartPreset::BatteryLevel,
        ChartPreset::ButtonPresses,
    ];

    /// Stable identifier, also the key in [`ChartWindows`].
    pub fn id(&self) -> &'static str {
        match self {
            ChartPreset::DeviceStatus => "device-status",
            ChartPreset::WifiStatus => "wifi-status",
            ChartPreset::BatteryLevel => "battery-level",
            ChartPreset::ButtonPresses => "button-presses",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Event types the chart reads.
    pub fn kinds(&self) -> &'static [&'static str] {
        match self {
            ChartPreset::DeviceStatus => &[channels::OFF_BODY],
            ChartPreset::WifiStatus => &[channels::WIFI_CONNECTED],
            ChartPreset::BatteryLevel => &[channels::LOW_BATTERY],
            ChartPreset::ButtonPresses => {
                &[channels::BUTTON_PRESS, channels::NOTIFICATION_BUTTON_PRESS]
            }
        }
    }

    /// Occurrence charts merge several types; the rest are step charts.
    pub fn is_occurrence(&self) -> bool {
        matches!(self, ChartPreset::ButtonPresses)
    }

    /// Number plotted for an event value.
    ///
    /// Device status is inverted: an off-body event plots 0 (not worn).
    pub fn plot_value(&self, value: &MeasurementValue) -> Option<f64> {
        match self {
            ChartPreset::DeviceStatus => Some(if value.is_truthy() { 0.0 } else { 1.0 }),
            ChartPreset::WifiStatus => Some(if value.is_truthy() { 1.0 } else { 0.0 }),
            ChartPreset::BatteryLevel => value.as_f64(),
            ChartPreset::ButtonPresses => Some(1.0),
        }
    }
}

/// A chart point with its value mapped to a plotted number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub display: String,
    pub raw_timestamp: EpochMillis,
    /// `None` when the value has no numeric reading (a gap in the line).
    pub value: Option<f64>,
}

/// Rendered output of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum ChartSeries {
    Step(Vec<PlotPoint>),
    Occurrences(Vec<OccurrencePoint>),
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        match self {
            ChartSeries::Step(points) => points.len(),
            ChartSeries::Occurrences(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn plot(preset: ChartPreset, points: Vec<ProjectedPoint>) -> Vec<PlotPoint> {
    points
        .into_iter()
        .map(|p| PlotPoint {
            value: preset.plot_value(&p.value),
            display: p.display,
            raw_timestamp: p.raw_timestamp,
        })
        .collect()
}

/// Explicit windows per chart id. A chart with no entry is in rolling mode.
///
/// Charts never share a window; setting one leaves the others untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartWindows {
    windows: HashMap<String, TimeWindow>,
}

impl ChartWindows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a chart to an explicit window.
    pub fn set_window(&mut self, chart: impl Into<String>, window: TimeWindow) {
        self.windows.insert(chart.into(), window);
    }

    /// Return a chart to rolling mode. Returns the window it had, if any.
    pub fn clear_window(&mut self, chart: &str) -> Option<TimeWindow> {
        self.windows.remove(chart)
    }

    pub fn window(&self, chart: &str) -> Option<&TimeWindow> {
        self.windows.get(chart)
    }

    pub fn is_rolling(&self, chart: &str) -> bool {
        !self.windows.contains_key(chart)
    }

    /// Render a preset chart using its own window.
    pub fn project<C: Clock>(
        &self,
        projector: &Projector<C>,
        measurements: &[Measurement],
        preset: ChartPreset,
    ) -> ChartSeries {
        let window = self.window(preset.id());
        if preset.is_occurrence() {
            ChartSeries::Occurrences(projector.merge_occurrences(
                measurements,
                preset.kinds(),
                window,
            ))
        } else {
            // Step presets read exactly one type
            let points = preset
                .kinds()
                .first()
                .map(|kind| projector.project(measurements, kind, window))
                .unwrap_or_default();
            ChartSeries::Step(plot(preset, points))
        }
    }
}
