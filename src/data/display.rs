//! Axis and tooltip labels for chart points.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use wearwatch_types::EpochMillis;

/// Byte unit labels, base 1024. Larger values stay in GB.
const BYTE_UNITS: &[&str] = &["B", "KB", "MB", "GB"];

/// Formats instants in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    offset: FixedOffset,
}

impl Default for Labels {
    fn default() -> Self {
        Self::utc()
    }
}

impl Labels {
    /// Labels rendered in UTC.
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Labels rendered at `minutes` east of UTC.
    ///
    /// Returns `None` for offsets of a day or more.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        Some(Self { offset })
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Two-line axis label: `dd/mm` over `HH:MM`.
    pub fn axis(&self, ts: EpochMillis) -> String {
        self.format(ts, "%d/%m\n%H:%M")
    }

    /// Tooltip label: `mm/dd HH:MM`.
    pub fn tooltip(&self, ts: EpochMillis) -> String {
        self.format(ts, "%m/%d %H:%M")
    }

    fn format(&self, ts: EpochMillis, fmt: &str) -> String {
        match DateTime::<Utc>::from_timestamp_millis(ts) {
            Some(dt) => dt.with_timezone(&self.offset).format(fmt).to_string(),
            // Out of chrono's range; the raw value is still a usable label
            None => ts.to_string(),
        }
    }
}

/// Format a byte count for display ("1.5 KB", "0 B").
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, BYTE_UNITS[unit])
}
