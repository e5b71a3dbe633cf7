//! Summary statistics over reconciled network samples.

use std::collections::HashMap;

use wearwatch_types::{NetworkLogRecord, NetworkStats, NetworkTypeCount};

/// Reduce a window of samples to means, totals and a network-type histogram.
///
/// Means over an empty slice are 0.0 and `sample_count` is 0; callers should
/// check [`NetworkStats::is_empty`] before presenting them.
pub fn aggregate(records: &[NetworkLogRecord]) -> NetworkStats {
    if records.is_empty() {
        return NetworkStats::default();
    }

    let n = records.len() as f64;
    let mut signal = 0.0;
    let mut speed = 0.0;
    let mut ping = 0.0;
    let mut total_rx = 0u64;
    let mut total_tx = 0u64;
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for r in records {
        signal += r.signal_strength;
        speed += r.speed();
        ping += r.ping;
        total_rx = total_rx.saturating_add(r.rx_bytes);
        total_tx = total_tx.saturating_add(r.tx_bytes);
        if let Some(label) = r.network_type.as_deref() {
            *counts.entry(label).or_default() += 1;
        }
    }

    NetworkStats {
        avg_signal: signal / n,
        avg_speed: speed / n,
        avg_ping: ping / n,
        total_rx,
        total_tx,
        type_histogram: histogram(counts),
        sample_count: records.len(),
    }
}

/// Most common network type first; ties ordered by label.
fn histogram(counts: HashMap<&str, usize>) -> Vec<NetworkTypeCount> {
    let mut histogram: Vec<NetworkTypeCount> = counts
        .into_iter()
        .map(|(label, count)| NetworkTypeCount {
            network_type: label.to_string(),
            count,
        })
        .collect();
    histogram.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.network_type.cmp(&b.network_type))
    });
    histogram
}
