//! Window selection for a single event type.
//!
//! Two modes:
//!
//! - **Explicit**: events of the type inside `[start, end]`, ascending.
//! - **Rolling**: the last `span` milliseconds before the type's latest event.
//!   The most recent event before the cutoff is carried forward to the cutoff
//!   so the chart never opens on an unknown state.

use wearwatch_types::{EpochMillis, Measurement, TimeWindow};

/// Events of `kind` sorted ascending by timestamp.
///
/// The sort is stable: events sharing a timestamp keep their input order.
fn sorted_of_kind(measurements: &[Measurement], kind: &str) -> Vec<Measurement> {
    let mut events: Vec<Measurement> = measurements
        .iter()
        .filter(|m| m.is_kind(kind))
        .cloned()
        .collect();
    events.sort_by_key(|m| m.timestamp);
    events
}

/// Events of `kind` inside `window`, ascending. No carry-forward.
pub fn select_explicit(
    measurements: &[Measurement],
    kind: &str,
    window: &TimeWindow,
) -> Vec<Measurement> {
    let mut events = sorted_of_kind(measurements, kind);
    events.retain(|m| window.contains(m.timestamp));
    events
}

/// Start of the rolling window: the type's latest timestamp minus `span`.
///
/// `None` when the type has no events.
pub fn rolling_cutoff(
    measurements: &[Measurement],
    kind: &str,
    span: EpochMillis,
) -> Option<EpochMillis> {
    measurements
        .iter()
        .filter(|m| m.is_kind(kind))
        .map(|m| m.timestamp)
        .max()
        .map(|latest| latest.saturating_sub(span))
}

/// Rolling selection with carry-forward.
///
/// The latest event before the cutoff, if any, is re-timestamped to the
/// cutoff and leads the result; every event at or after the cutoff follows.
pub fn select_rolling(
    measurements: &[Measurement],
    kind: &str,
    span: EpochMillis,
) -> Vec<Measurement> {
    let events = sorted_of_kind(measurements, kind);
    let Some(latest) = events.last().map(|m| m.timestamp) else {
        return Vec::new();
    };
    let cutoff = latest.saturating_sub(span);

    // First index at or after the cutoff; everything before it is older.
    let split = events.partition_point(|m| m.timestamp < cutoff);

    let mut selected = Vec::with_capacity(events.len() - split + 1);
    if split > 0 {
        let mut carried = events[split - 1].clone();
        carried.timestamp = cutoff;
        selected.push(carried);
    }
    selected.extend_from_slice(&events[split..]);
    selected
}

/// Rolling selection without carry-forward.
///
/// Used for occurrence charts, where a carried point would invent an event.
pub fn select_recent(
    measurements: &[Measurement],
    kind: &str,
    span: EpochMillis,
) -> Vec<Measurement> {
    let mut events = sorted_of_kind(measurements, kind);
    if let Some(latest) = events.last().map(|m| m.timestamp) {
        let cutoff = latest.saturating_sub(span);
        events.retain(|m| m.timestamp >= cutoff);
    }
    events
}

/// Explicit selection when a window is given, rolling otherwise.
pub fn select(
    measurements: &[Measurement],
    kind: &str,
    window: Option<&TimeWindow>,
    span: EpochMillis,
) -> Vec<Measurement> {
    match window {
        Some(window) => select_explicit(measurements, kind, window),
        None => select_rolling(measurements, kind, span),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wearwatch_types::{MeasurementValue, DAY_MS, HOUR_MS};

    fn ev(ts: EpochMillis, kind: &str, value: impl Into<MeasurementValue>) -> Measurement {
        Measurement::new(ts, kind, value.into())
    }

    fn timestamps(ms: &[Measurement]) -> Vec<EpochMillis> {
        ms.iter().map(|m| m.timestamp).collect()
    }

    #[test]
    fn explicit_filters_type_and_bounds_inclusive() {
        let ms = vec![
            ev(5000, "wifi_connected", false),
            ev(1000, "wifi_connected", true),
            ev(3000, "off_body", true),
            ev(6000, "wifi_connected", true),
            ev(999, "wifi_connected", true),
        ];

        let selected = select_explicit(&ms, "wifi_connected", &TimeWindow::new(1000, 6000));
        assert_eq!(timestamps(&selected), vec![1000, 5000, 6000]);
    }

    #[test]
    fn explicit_never_carries_forward() {
        let ms = vec![ev(500, "wifi_connected", true), ev(2000, "wifi_connected", false)];
        let selected = select_explicit(&ms, "wifi_connected", &TimeWindow::new(1000, 3000));
        assert_eq!(timestamps(&selected), vec![2000]);
    }

    #[test]
    fn explicit_sort_is_stable_for_ties() {
        let ms = vec![
            ev(1000, "low_battery", 40.0),
            ev(1000, "low_battery", 39.0),
        ];
        let selected = select_explicit(&ms, "low_battery", &TimeWindow::new(0, 2000));
        assert_eq!(selected[0].value, MeasurementValue::Number(40.0));
        assert_eq!(selected[1].value, MeasurementValue::Number(39.0));
    }

    #[test]
    fn rolling_carries_latest_pre_cutoff_event() {
        let latest = 10 * DAY_MS;
        let cutoff = latest - DAY_MS;
        let ms = vec![
            ev(cutoff - 5 * HOUR_MS, "off_body", false),
            ev(cutoff - HOUR_MS, "off_body", true),
            ev(cutoff + HOUR_MS, "off_body", false),
            ev(latest, "off_body", true),
        ];

        let selected = select_rolling(&ms, "off_body", DAY_MS);
        assert_eq!(timestamps(&selected), vec![cutoff, cutoff + HOUR_MS, latest]);
        assert_eq!(selected[0].value, MeasurementValue::Bool(true));
    }

    #[test]
    fn rolling_without_older_events_has_no_carry() {
        let ms = vec![ev(1000, "off_body", true), ev(2000, "off_body", false)];
        let selected = select_rolling(&ms, "off_body", DAY_MS);
        assert_eq!(timestamps(&selected), vec![1000, 2000]);
    }

    #[test]
    fn rolling_keeps_event_exactly_at_cutoff() {
        let ms = vec![ev(0, "off_body", true), ev(DAY_MS, "off_body", false)];
        let selected = select_rolling(&ms, "off_body", DAY_MS);
        assert_eq!(timestamps(&selected), vec![0, DAY_MS]);
        assert_eq!(selected[0].value, MeasurementValue::Bool(true));
    }

    #[test]
    fn rolling_ignores_other_types_for_latest() {
        let ms = vec![
            ev(1000, "off_body", true),
            ev(5 * DAY_MS, "wifi_connected", true),
        ];
        let selected = select_rolling(&ms, "off_body", DAY_MS);
        assert_eq!(timestamps(&selected), vec![1000]);
    }

    #[test]
    fn rolling_empty_type_yields_nothing() {
        let ms = vec![ev(1000, "wifi_connected", true)];
        assert!(select_rolling(&ms, "off_body", DAY_MS).is_empty());
        assert!(rolling_cutoff(&ms, "off_body", DAY_MS).is_none());
    }

    #[test]
    fn rolling_cutoff_from_latest() {
        let ms = vec![ev(DAY_MS * 3, "a", true), ev(DAY_MS * 2, "a", true)];
        assert_eq!(rolling_cutoff(&ms, "a", DAY_MS), Some(DAY_MS * 2));
    }

    #[test]
    fn recent_selection_drops_older_without_carry() {
        let ms = vec![
            ev(0, "button_press", true),
            ev(DAY_MS + 10, "button_press", true),
            ev(2 * DAY_MS, "button_press", true),
        ];
        let selected = select_recent(&ms, "button_press", DAY_MS);
        assert_eq!(timestamps(&selected), vec![DAY_MS + 10, 2 * DAY_MS]);
    }

    #[test]
    fn select_dispatches_on_window() {
        let ms = vec![ev(0, "a", true), ev(2 * DAY_MS, "a", false)];
        assert_eq!(
            timestamps(&select(&ms, "a", Some(&TimeWindow::new(0, 10)), DAY_MS)),
            vec![0]
        );
        assert_eq!(
            timestamps(&select(&ms, "a", None, DAY_MS)),
            vec![DAY_MS, 2 * DAY_MS]
        );
    }
}
