//! Time representation and query windows.
//!
//! Every instant in the engine is an epoch-millisecond integer so that
//! arithmetic like "one millisecond before the next change" stays exact.

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// One second in milliseconds.
pub const SECOND_MS: EpochMillis = 1_000;

/// One hour in milliseconds.
pub const HOUR_MS: EpochMillis = 60 * 60 * SECOND_MS;

/// One day in milliseconds; the default rolling span.
pub const DAY_MS: EpochMillis = 24 * HOUR_MS;

/// Inclusive `[start, end]` bounds of a chart query.
///
/// A window whose `end` precedes its `start` contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub start: EpochMillis,
    pub end: EpochMillis,
}

impl TimeWindow {
    /// Create a window from explicit bounds.
    pub const fn new(start: EpochMillis, end: EpochMillis) -> Self {
        Self { start, end }
    }

    /// Window of `span` milliseconds ending at `end`.
    pub const fn ending_at(end: EpochMillis, span: EpochMillis) -> Self {
        Self {
            start: end.saturating_sub(span),
            end,
        }
    }

    /// Check whether `ts` lies inside the window (both bounds inclusive).
    pub const fn contains(&self, ts: EpochMillis) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// Length of the window in milliseconds; zero for an inverted window.
    pub const fn span(&self) -> EpochMillis {
        if self.end > self.start {
            self.end - self.start
        } else {
            0
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.end < self.start
    }
}
