//! Step projection: discrete state changes into a stair-step point series.
//!
//! Each event contributes its own point plus a hold point one millisecond
//! before the next event, carrying the old value. Step-after interpolation
//! between the two then keeps the old state right up to the change:
//!
//! ```text
//! events:  t0=A          t1=B          t2=C
//! points:  (t0,A) (t1-1,A) (t1,B) (t2-1,B) (t2,C) [(now,C)]
//! ```
//!
//! The trailing `now` point is only added for rolling charts.

use wearwatch_types::{EpochMillis, Measurement, ProjectedPoint};

use super::display::Labels;

/// Project ascending same-type events into step points.
///
/// `trailing` is the instant to extend the last value to (rolling mode).
/// Output has `2n - 1` points, or `2n` with a trailing instant; an empty
/// input yields no points at all.
///
/// Hold points are labelled with the next event's time, so the two points
/// around a change share an axis label. When two events share a timestamp
/// the hold point is clamped to that timestamp rather than stepping back.
pub fn step_points(
    events: &[Measurement],
    labels: &Labels,
    trailing: Option<EpochMillis>,
) -> Vec<ProjectedPoint> {
    let Some(last) = events.last() else {
        return Vec::new();
    };

    let mut points = Vec::with_capacity(events.len() * 2);
    for (i, event) in events.iter().enumerate() {
        points.push(ProjectedPoint {
            display: labels.axis(event.timestamp),
            raw_timestamp: event.timestamp,
            value: event.value.clone(),
        });

        if let Some(next) = events.get(i + 1) {
            points.push(ProjectedPoint {
                display: labels.axis(next.timestamp),
                raw_timestamp: next.timestamp.saturating_sub(1).max(event.timestamp),
                value: event.value.clone(),
            });
        }
    }

    if let Some(now) = trailing {
        points.push(ProjectedPoint {
            display: labels.axis(now),
            raw_timestamp: now,
            value: last.value.clone(),
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use wearwatch_types::MeasurementValue;

    fn ev(ts: EpochMillis, value: impl Into<MeasurementValue>) -> Measurement {
        Measurement::new(ts, "wifi_connected", value.into())
    }

    fn raw(points: &[ProjectedPoint]) -> Vec<(EpochMillis, MeasurementValue)> {
        points
            .iter()
            .map(|p| (p.raw_timestamp, p.value.clone()))
            .collect()
    }

    #[test]
    fn two_events_yield_hold_point() {
        let events = vec![ev(1000, true), ev(5000, false)];
        let points = step_points(&events, &Labels::utc(), None);

        assert_eq!(
            raw(&points),
            vec![
                (1000, MeasurementValue::Bool(true)),
                (4999, MeasurementValue::Bool(true)),
                (5000, MeasurementValue::Bool(false)),
            ]
        );
    }

    #[test]
    fn hold_point_uses_next_event_label() {
        let events = vec![ev(1_700_000_000_000, true), ev(1_700_000_060_000, false)];
        let labels = Labels::utc();
        let points = step_points(&events, &labels, None);

        assert_eq!(points[0].display, labels.axis(1_700_000_000_000));
        assert_eq!(points[1].display, labels.axis(1_700_000_060_000));
        assert_eq!(points[2].display, labels.axis(1_700_000_060_000));
    }

    #[test]
    fn explicit_length_is_two_n_minus_one() {
        for n in 1..6 {
            let events: Vec<_> = (0..n).map(|i| ev(i * 1000, i % 2 == 0)).collect();
            let points = step_points(&events, &Labels::utc(), None);
            assert_eq!(points.len() as i64, 2 * n - 1);
        }
    }

    #[test]
    fn trailing_point_extends_last_value() {
        let events = vec![ev(1000, true), ev(5000, false)];
        let points = step_points(&events, &Labels::utc(), Some(9000));

        assert_eq!(points.len(), 4);
        let last = points.last().unwrap();
        assert_eq!(last.raw_timestamp, 9000);
        assert_eq!(last.value, MeasurementValue::Bool(false));
    }

    #[test]
    fn single_event_with_trailing_point() {
        let points = step_points(&[ev(1000, 42.0)], &Labels::utc(), Some(2000));
        assert_eq!(
            raw(&points),
            vec![
                (1000, MeasurementValue::Number(42.0)),
                (2000, MeasurementValue::Number(42.0)),
            ]
        );
    }

    #[test]
    fn empty_input_yields_nothing_even_when_rolling() {
        assert!(step_points(&[], &Labels::utc(), None).is_empty());
        assert!(step_points(&[], &Labels::utc(), Some(1000)).is_empty());
    }

    #[test]
    fn shared_timestamp_hold_does_not_step_back() {
        let events = vec![ev(1000, true), ev(1000, false)];
        let points = step_points(&events, &Labels::utc(), None);
        let ts: Vec<_> = points.iter().map(|p| p.raw_timestamp).collect();
        assert_eq!(ts, vec![1000, 1000, 1000]);
    }

    #[test]
    fn hold_point_at_minimum_timestamp() {
        let events = vec![ev(i64::MIN, true), ev(i64::MIN, false)];
        let points = step_points(&events, &Labels::utc(), None);
        let ts: Vec<_> = points.iter().map(|p| p.raw_timestamp).collect();
        assert_eq!(ts, vec![i64::MIN, i64::MIN, i64::MIN]);
    }

    #[test]
    fn raw_timestamps_never_decrease() {
        let events = vec![ev(10, 1.0), ev(11, 2.0), ev(500, 3.0), ev(501, 4.0)];
        let points = step_points(&events, &Labels::utc(), Some(1000));
        assert!(points
            .windows(2)
            .all(|w| w[0].raw_timestamp <= w[1].raw_timestamp));
    }
}
