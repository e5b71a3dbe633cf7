//! Merging several event types into one occurrence series.
//!
//! Used for "what happened when" bar charts such as button presses versus
//! notification-button presses. Each output point marks a single occurrence;
//! there is no state holding between points.

use std::collections::BTreeMap;

use wearwatch_types::{Measurement, OccurrencePoint};

use super::display::Labels;

/// Merge independently windowed series into one chronological series.
///
/// `series[i]` holds the events of `kinds[i]`. The series are concatenated in
/// that order and stably sorted by timestamp, so simultaneous events keep
/// their input order. Every point carries a marker for each requested kind:
/// 1 for the kind that occurred, 0 for the rest.
///
/// Kinds without a matching series are still given a (zero) column.
pub fn merge_series(
    kinds: &[&str],
    series: &[Vec<Measurement>],
    labels: &Labels,
) -> Vec<OccurrencePoint> {
    let zeroed: BTreeMap<String, u8> = kinds.iter().map(|k| (k.to_string(), 0)).collect();

    let mut tagged: Vec<(&str, &Measurement)> = kinds
        .iter()
        .zip(series)
        .flat_map(|(kind, events)| events.iter().map(move |m| (*kind, m)))
        .collect();
    tagged.sort_by_key(|(_, m)| m.timestamp);

    tagged
        .into_iter()
        .map(|(kind, m)| {
            let mut markers = zeroed.clone();
            markers.insert(kind.to_string(), 1);
            OccurrencePoint {
                display: labels.axis(m.timestamp),
                raw_timestamp: m.timestamp,
                markers,
            }
        })
        .collect()
}

/// Requested kinds with duplicates removed, first occurrence wins.
pub fn distinct_kinds<'a>(kinds: &[&'a str]) -> Vec<&'a str> {
    let mut seen = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !seen.contains(kind) {
            seen.push(*kind);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use wearwatch_types::EpochMillis;

    fn press(ts: EpochMillis, kind: &str) -> Measurement {
        Measurement::new(ts, kind, true.into())
    }

    #[test]
    fn two_types_interleave_by_time() {
        let kinds = ["button_press", "notification_button_press"];
        let series = vec![
            vec![press(10, "button_press")],
            vec![press(20, "notification_button_press")],
        ];

        let points = merge_series(&kinds, &series, &Labels::utc());
        assert_eq!(points.len(), 2);

        assert_eq!(points[0].raw_timestamp, 10);
        assert_eq!(points[0].marker("button_press"), 1);
        assert_eq!(points[0].marker("notification_button_press"), 0);

        assert_eq!(points[1].raw_timestamp, 20);
        assert_eq!(points[1].marker("button_press"), 0);
        assert_eq!(points[1].marker("notification_button_press"), 1);
    }

    #[test]
    fn exactly_one_marker_set_per_point() {
        let kinds = ["a", "b", "c"];
        let series = vec![
            vec![press(30, "a"), press(60, "a")],
            vec![press(10, "b")],
            vec![press(40, "c"), press(50, "c")],
        ];

        let points = merge_series(&kinds, &series, &Labels::utc());
        let ts: Vec<_> = points.iter().map(|p| p.raw_timestamp).collect();
        assert_eq!(ts, vec![10, 30, 40, 50, 60]);

        for p in &points {
            assert_eq!(p.markers.len(), 3);
            assert_eq!(p.markers.values().map(|&v| v as u32).sum::<u32>(), 1);
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let kinds = ["a", "b"];
        let series = vec![vec![press(10, "a")], vec![press(10, "b")]];
        let points = merge_series(&kinds, &series, &Labels::utc());
        assert_eq!(points[0].occurred(), Some("a"));
        assert_eq!(points[1].occurred(), Some("b"));
    }

    #[test]
    fn empty_series_give_no_points() {
        let kinds = ["a", "b"];
        let series = vec![vec![], vec![]];
        assert!(merge_series(&kinds, &series, &Labels::utc()).is_empty());
        assert!(merge_series(&[], &[], &Labels::utc()).is_empty());
    }

    #[test]
    fn distinct_kinds_drops_repeats() {
        assert_eq!(distinct_kinds(&["a", "b", "a", "c", "b"]), vec!["a", "b", "c"]);
    }
}
