//! Network log reconciliation.
//!
//! Logs arrive from two places with the same logical shape but different
//! timestamp encodings: the per-user subcollection returns structured
//! `{seconds, nanoseconds}` pairs, the query service returns epoch-ms strings
//! or dates. Reconciliation normalizes the timestamps, filters to a window,
//! flattens every sample to plain numbers, resolves same-millisecond
//! collisions and sorts ascending.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use wearwatch_types::{
    EpochMillis, MeasurementValue, NetworkLogRecord, RawNetworkLog, RawTimestamp, TimeWindow,
};

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Naive date-time layouts accepted for string timestamps, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// What to do when two samples land on the same millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Shift the later sample forward 1ms at a time until its timestamp is
    /// free. Keeps every sample but displaces its time slightly.
    #[default]
    Offset,
    /// Fold the later sample into the earlier one: gauges are averaged,
    /// byte counters summed, charging OR-ed.
    Merge,
}

/// Options for [`reconcile_logs_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub policy: CollisionPolicy,
    /// Keep only samples with this network type label.
    pub network_type: Option<String>,
    /// Keep at most this many of the most recent samples.
    pub limit: Option<usize>,
}

/// Normalize a raw timestamp to `(seconds, nanoseconds)`.
///
/// Strings are read as integer epoch milliseconds first, then as dates.
/// Returns `None` for unparseable strings.
pub fn normalize_timestamp(raw: &RawTimestamp) -> Option<(i64, i64)> {
    match raw {
        RawTimestamp::Structured {
            seconds,
            nanoseconds,
        } => Some((*seconds, *nanoseconds)),
        RawTimestamp::Millis(ms) => Some(split_millis(*ms)),
        RawTimestamp::Text(s) => parse_text_timestamp(s).map(split_millis),
    }
}

fn split_millis(ms: EpochMillis) -> (i64, i64) {
    (ms.div_euclid(1000), ms.rem_euclid(1000) * NANOS_PER_MILLI)
}

/// Parse a timestamp string: epoch milliseconds, RFC 3339, a naive
/// date-time (UTC) or a bare date (UTC midnight).
pub fn parse_text_timestamp(s: &str) -> Option<EpochMillis> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<EpochMillis>() {
        return Some(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Battery usage as a float, with any unit suffix (`%`, `mAh`, ...) removed.
///
/// Unparseable or missing readings count as 0.
pub fn parse_battery_usage(value: Option<&MeasurementValue>) -> f64 {
    match value {
        Some(MeasurementValue::Number(n)) => *n,
        Some(MeasurementValue::Text(s)) => {
            let numeric = s
                .trim()
                .trim_end_matches(|c: char| !(c.is_ascii_digit() || c == '.'))
                .trim();
            numeric.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Flatten a raw sample, defaulting every missing metric to zero.
pub fn flatten(raw: &RawNetworkLog, timestamp: EpochMillis) -> NetworkLogRecord {
    let usage = raw.data_usage.unwrap_or_default();
    NetworkLogRecord {
        timestamp,
        signal_strength: raw.signal_strength.unwrap_or(0.0),
        download_speed: raw.download_speed.unwrap_or(0.0),
        ping: raw.ping.unwrap_or(0.0),
        jitter: raw.jitter.unwrap_or(0.0),
        snr: raw.snr.unwrap_or(0.0),
        link_speed: raw.link_speed.unwrap_or(0.0),
        battery_usage: parse_battery_usage(raw.battery_usage.as_ref()),
        rx_bytes: byte_count(usage.rx_bytes),
        tx_bytes: byte_count(usage.tx_bytes),
        is_charging: raw.is_charging.unwrap_or(false),
        network_type: raw.network_type.clone(),
        location: raw.location,
    }
}

fn byte_count(v: f64) -> u64 {
    // Float to int casts saturate; negatives and NaN become 0
    v as u64
}

/// Reconcile raw logs into an ascending series with unique timestamps,
/// using the default options.
pub fn reconcile_logs(records: &[RawNetworkLog], window: &TimeWindow) -> Vec<NetworkLogRecord> {
    reconcile_logs_with(records, window, &ReconcileOptions::default())
}

/// Reconcile raw logs into an ascending series with unique timestamps.
///
/// Records with a missing, unparseable or negative timestamp are dropped.
/// Window membership is decided on whole seconds (`seconds * 1000`).
/// Collisions are resolved in input order per `options.policy`.
pub fn reconcile_logs_with(
    records: &[RawNetworkLog],
    window: &TimeWindow,
    options: &ReconcileOptions,
) -> Vec<NetworkLogRecord> {
    let mut dropped = 0usize;
    let candidates = records.iter().filter_map(|raw| {
        let Some((seconds, nanos)) = raw.timestamp.as_ref().and_then(normalize_timestamp) else {
            dropped += 1;
            return None;
        };
        let whole = seconds.checked_mul(1000)?;
        if !window.contains(whole) {
            return None;
        }
        if let Some(wanted) = &options.network_type {
            if raw.network_type.as_ref() != Some(wanted) {
                return None;
            }
        }
        let ts = whole.checked_add(nanos.div_euclid(NANOS_PER_MILLI))?;
        if ts < 0 {
            return None;
        }
        Some(flatten(raw, ts))
    });

    let mut out = match options.policy {
        CollisionPolicy::Offset => dedup_offset(candidates),
        CollisionPolicy::Merge => dedup_merge(candidates),
    };
    out.sort_by_key(|r| r.timestamp);

    if let Some(limit) = options.limit {
        if out.len() > limit {
            out.drain(..out.len() - limit);
        }
    }

    debug!(
        input = records.len(),
        output = out.len(),
        unparseable = dropped,
        "Reconciled network logs"
    );
    out
}

/// Bump colliding timestamps by 1ms until unique.
///
/// A sample that would have to move past `i64::MAX` is dropped.
fn dedup_offset(records: impl Iterator<Item = NetworkLogRecord>) -> Vec<NetworkLogRecord> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    'records: for mut record in records {
        while !seen.insert(record.timestamp) {
            match record.timestamp.checked_add(1) {
                Some(next) => record.timestamp = next,
                None => {
                    debug!(
                        timestamp = record.timestamp,
                        "Dropping colliding network log with no free timestamp"
                    );
                    continue 'records;
                }
            }
        }
        out.push(record);
    }
    out
}

/// Fold colliding samples into the first sample at that millisecond.
fn dedup_merge(records: impl Iterator<Item = NetworkLogRecord>) -> Vec<NetworkLogRecord> {
    let mut slots: HashMap<EpochMillis, (usize, u32)> = HashMap::new();
    let mut out: Vec<NetworkLogRecord> = Vec::new();
    for record in records {
        match slots.entry(record.timestamp) {
            Entry::Vacant(slot) => {
                slot.insert((out.len(), 1));
                out.push(record);
            }
            Entry::Occupied(mut slot) => {
                let (index, count) = slot.get_mut();
                *count += 1;
                fold_into(&mut out[*index], &record, *count);
            }
        }
    }
    out
}

/// Running-mean fold of `incoming` into `acc`, which already holds `n - 1` samples.
fn fold_into(acc: &mut NetworkLogRecord, incoming: &NetworkLogRecord, n: u32) {
    let n = f64::from(n);
    let mean = |old: f64, new: f64| old + (new - old) / n;

    acc.signal_strength = mean(acc.signal_strength, incoming.signal_strength);
    acc.download_speed = mean(acc.download_speed, incoming.download_speed);
    acc.ping = mean(acc.ping, incoming.ping);
    acc.jitter = mean(acc.jitter, incoming.jitter);
    acc.snr = mean(acc.snr, incoming.snr);
    acc.link_speed = mean(acc.link_speed, incoming.link_speed);
    acc.battery_usage = mean(acc.battery_usage, incoming.battery_usage);
    acc.rx_bytes = acc.rx_bytes.saturating_add(incoming.rx_bytes);
    acc.tx_bytes = acc.tx_bytes.saturating_add(incoming.tx_bytes);
    acc.is_charging |= incoming.is_charging;
    if acc.network_type.is_none() {
        acc.network_type = incoming.network_type.clone();
    }
    if acc.location.is_none() {
        acc.location = incoming.location;
    }
}

/// Distinct network type labels, in first-seen order.
pub fn network_types(records: &[RawNetworkLog]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for label in records.iter().filter_map(|r| r.network_type.as_ref()) {
        if !types.contains(label) {
            types.push(label.clone());
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use wearwatch_types::DataUsage;

    const EVERYTHING: TimeWindow = TimeWindow::new(0, i64::MAX);

    fn log_at(ts: RawTimestamp) -> RawNetworkLog {
        RawNetworkLog {
            timestamp: Some(ts),
            ..Default::default()
        }
    }

    fn log_ms(ms: &str) -> RawNetworkLog {
        log_at(RawTimestamp::Text(ms.to_string()))
    }

    fn timestamps(records: &[NetworkLogRecord]) -> Vec<EpochMillis> {
        records.iter().map(|r| r.timestamp).collect()
    }

    #[test]
    fn duplicate_timestamps_are_offset() {
        let out = reconcile_logs(&[log_ms("100"), log_ms("100")], &EVERYTHING);
        assert_eq!(timestamps(&out), vec![100, 101]);
    }

    #[test]
    fn triple_collision_stays_unique() {
        let out = reconcile_logs(&[log_ms("100"), log_ms("100"), log_ms("100")], &EVERYTHING);
        assert_eq!(timestamps(&out), vec![100, 101, 102]);
    }

    #[test]
    fn bump_cascades_into_existing_timestamp() {
        let out = reconcile_logs(&[log_ms("101"), log_ms("100"), log_ms("100")], &EVERYTHING);
        assert_eq!(timestamps(&out), vec![100, 101, 102]);
    }

    #[test]
    fn collision_at_max_timestamp_is_dropped() {
        let at_max = || {
            log_at(RawTimestamp::Structured {
                seconds: i64::MAX / 1000,
                nanoseconds: 807_000_000,
            })
        };
        let out = reconcile_logs(&[at_max(), at_max(), log_ms("100")], &EVERYTHING);
        assert_eq!(timestamps(&out), vec![100, i64::MAX]);
    }

    #[test]
    fn bumped_sample_may_pass_window_end() {
        let out = reconcile_logs(&[log_ms("2000"), log_ms("2000")], &TimeWindow::new(0, 2000));
        assert_eq!(timestamps(&out), vec![2000, 2001]);
    }

    #[test]
    fn output_is_strictly_ascending() {
        let input: Vec<_> = ["500", "100", "300", "100", "500", "200"]
            .iter()
            .map(|s| log_ms(s))
            .collect();
        let out = reconcile_logs(&input, &EVERYTHING);
        assert_eq!(out.len(), input.len());
        assert!(out.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn structured_and_string_timestamps_agree() {
        let out = reconcile_logs(
            &[
                log_at(RawTimestamp::Structured {
                    seconds: 1_700_000_000,
                    nanoseconds: 250_000_000,
                }),
                log_ms("1700000001000"),
            ],
            &EVERYTHING,
        );
        assert_eq!(timestamps(&out), vec![1_700_000_000_250, 1_700_000_001_000]);
    }

    #[test]
    fn date_strings_are_parsed() {
        assert_eq!(
            parse_text_timestamp("2023-11-14T22:13:20Z"),
            Some(1_700_000_000_000)
        );
        assert_eq!(
            parse_text_timestamp("2023-11-14T23:13:20+01:00"),
            Some(1_700_000_000_000)
        );
        assert_eq!(
            parse_text_timestamp("2023-11-14 22:13:20"),
            Some(1_700_000_000_000)
        );
        assert_eq!(parse_text_timestamp("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_text_timestamp(" 42 "), Some(42));
        assert_eq!(parse_text_timestamp("last tuesday"), None);
    }

    #[test]
    fn unparseable_and_missing_timestamps_are_dropped() {
        let out = reconcile_logs(
            &[log_ms("soon"), RawNetworkLog::default(), log_ms("100")],
            &EVERYTHING,
        );
        assert_eq!(timestamps(&out), vec![100]);
    }

    #[test]
    fn negative_timestamps_are_dropped() {
        let window = TimeWindow::new(i64::MIN / 2, i64::MAX);
        let out = reconcile_logs(&[log_ms("-5000"), log_ms("10")], &window);
        assert_eq!(timestamps(&out), vec![10]);
    }

    #[test]
    fn window_filter_uses_whole_seconds() {
        let logs = [
            log_at(RawTimestamp::Structured {
                seconds: 9,
                nanoseconds: 999_000_000,
            }),
            log_at(RawTimestamp::Structured {
                seconds: 10,
                nanoseconds: 500_000_000,
            }),
            log_at(RawTimestamp::Structured {
                seconds: 20,
                nanoseconds: 0,
            }),
            log_at(RawTimestamp::Structured {
                seconds: 21,
                nanoseconds: 0,
            }),
        ];
        let out = reconcile_logs(&logs, &TimeWindow::new(10_000, 20_000));
        assert_eq!(timestamps(&out), vec![10_500, 20_000]);
    }

    #[test]
    fn missing_metrics_default_to_zero() {
        let out = reconcile_logs(&[log_ms("100")], &EVERYTHING);
        let r = &out[0];
        assert_eq!(r.signal_strength, 0.0);
        assert_eq!(r.download_speed, 0.0);
        assert_eq!(r.rx_bytes, 0);
        assert_eq!(r.battery_usage, 0.0);
        assert!(!r.is_charging);
        assert!(r.network_type.is_none());
    }

    #[test]
    fn flatten_copies_metrics() {
        let raw = RawNetworkLog {
            signal_strength: Some(-70.0),
            download_speed: Some(12.5),
            ping: Some(30.0),
            link_speed: Some(72.0),
            battery_usage: Some("3.5%".into()),
            data_usage: Some(DataUsage {
                rx_bytes: 2048.0,
                tx_bytes: 1024.0,
            }),
            is_charging: Some(true),
            network_type: Some("wifi".into()),
            ..Default::default()
        };
        let r = flatten(&raw, 7);
        assert_eq!(r.timestamp, 7);
        assert_eq!(r.signal_strength, -70.0);
        assert_eq!(r.speed(), 72.0);
        assert_eq!(r.battery_usage, 3.5);
        assert_eq!(r.rx_bytes, 2048);
        assert_eq!(r.tx_bytes, 1024);
        assert!(r.is_charging);
    }

    #[test]
    fn battery_usage_suffixes() {
        let text = |s: &str| MeasurementValue::Text(s.into());
        assert_eq!(parse_battery_usage(Some(&text("12.5%"))), 12.5);
        assert_eq!(parse_battery_usage(Some(&text("300 mAh"))), 300.0);
        assert_eq!(parse_battery_usage(Some(&text("7"))), 7.0);
        assert_eq!(parse_battery_usage(Some(&text("n/a"))), 0.0);
        assert_eq!(parse_battery_usage(Some(&text(""))), 0.0);
        assert_eq!(
            parse_battery_usage(Some(&MeasurementValue::Number(4.25))),
            4.25
        );
        assert_eq!(parse_battery_usage(None), 0.0);
    }

    #[test]
    fn merge_policy_folds_collisions() {
        let mut a = log_ms("100");
        a.signal_strength = Some(-60.0);
        a.data_usage = Some(DataUsage {
            rx_bytes: 100.0,
            tx_bytes: 10.0,
        });
        let mut b = log_ms("100");
        b.signal_strength = Some(-80.0);
        b.is_charging = Some(true);
        b.network_type = Some("LTE".into());
        b.data_usage = Some(DataUsage {
            rx_bytes: 50.0,
            tx_bytes: 5.0,
        });

        let options = ReconcileOptions {
            policy: CollisionPolicy::Merge,
            ..Default::default()
        };
        let out = reconcile_logs_with(&[a, b, log_ms("200")], &EVERYTHING, &options);

        assert_eq!(timestamps(&out), vec![100, 200]);
        let merged = &out[0];
        assert_eq!(merged.signal_strength, -70.0);
        assert_eq!(merged.rx_bytes, 150);
        assert_eq!(merged.tx_bytes, 15);
        assert!(merged.is_charging);
        assert_eq!(merged.network_type.as_deref(), Some("LTE"));
    }

    #[test]
    fn merge_policy_running_mean_over_three() {
        let mut logs = Vec::new();
        for ping in [10.0, 20.0, 60.0] {
            let mut l = log_ms("100");
            l.ping = Some(ping);
            logs.push(l);
        }
        let options = ReconcileOptions {
            policy: CollisionPolicy::Merge,
            ..Default::default()
        };
        let out = reconcile_logs_with(&logs, &EVERYTHING, &options);
        assert_eq!(out.len(), 1);
        assert!((out[0].ping - 30.0).abs() < 1e-9);
    }

    #[test]
    fn network_type_filter() {
        let mut wifi = log_ms("100");
        wifi.network_type = Some("wifi".into());
        let mut lte = log_ms("200");
        lte.network_type = Some("LTE".into());

        let options = ReconcileOptions {
            network_type: Some("LTE".into()),
            ..Default::default()
        };
        let out = reconcile_logs_with(&[wifi, lte, log_ms("300")], &EVERYTHING, &options);
        assert_eq!(timestamps(&out), vec![200]);
    }

    #[test]
    fn limit_keeps_most_recent() {
        let logs: Vec<_> = ["400", "100", "300", "200"].iter().map(|s| log_ms(s)).collect();
        let options = ReconcileOptions {
            limit: Some(2),
            ..Default::default()
        };
        let out = reconcile_logs_with(&logs, &EVERYTHING, &options);
        assert_eq!(timestamps(&out), vec![300, 400]);
    }

    #[test]
    fn distinct_network_types_in_first_seen_order() {
        let mut logs = Vec::new();
        for label in [Some("LTE"), None, Some("wifi"), Some("LTE")] {
            let mut l = log_ms("1");
            l.network_type = label.map(String::from);
            logs.push(l);
        }
        assert_eq!(network_types(&logs), vec!["LTE", "wifi"]);
    }

    #[test]
    fn collision_policy_deserializes_lowercase() {
        let p: CollisionPolicy = serde_json::from_str(r#""merge""#).unwrap();
        assert_eq!(p, CollisionPolicy::Merge);
        assert_eq!(CollisionPolicy::default(), CollisionPolicy::Offset);
    }
}
