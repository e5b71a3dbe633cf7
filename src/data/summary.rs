//! Per-user roll-up for the user list.

use serde::Serialize;

use wearwatch_types::{channels, EpochMillis, Measurement};

/// One user's activity summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    /// Any wifi-connected event reported a truthy value.
    pub active: bool,
    /// Mean of numeric low-battery readings; 0 when there are none.
    pub average_battery: f64,
    /// Events carrying a location fix.
    pub located_events: usize,
    pub last_activity: Option<EpochMillis>,
    pub event_count: usize,
}

/// Summarize one user's measurements.
pub fn summarize(user_id: impl Into<String>, measurements: &[Measurement]) -> UserSummary {
    let active = measurements
        .iter()
        .any(|m| m.is_kind(channels::WIFI_CONNECTED) && m.value.is_truthy());

    let battery: Vec<f64> = measurements
        .iter()
        .filter(|m| m.is_kind(channels::LOW_BATTERY))
        .filter_map(|m| m.value.as_f64())
        .collect();
    let average_battery = if battery.is_empty() {
        0.0
    } else {
        battery.iter().sum::<f64>() / battery.len() as f64
    };

    UserSummary {
        user_id: user_id.into(),
        active,
        average_battery,
        located_events: measurements
            .iter()
            .filter(|m| m.attributes.has_location_fix())
            .count(),
        last_activity: measurements.iter().map(|m| m.timestamp).max(),
        event_count: measurements.len(),
    }
}

/// Most recently active first; users with no activity last.
pub fn sort_by_activity(summaries: &mut [UserSummary]) {
    summaries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
}
