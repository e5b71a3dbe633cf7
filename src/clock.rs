//! Source of "now" for rolling-window projections.
//!
//! Rolling charts extend their last value to the current instant. Reading
//! the wall clock directly would make those projections untestable, so the
//! engine asks a [`Clock`] instead.

use std::time::{SystemTime, UNIX_EPOCH};

use wearwatch_types::EpochMillis;

/// Anything that can report the current instant in epoch milliseconds.
///
/// Implemented for plain closures, so `&|| 1_700_000_000_000` works as a clock.
pub trait Clock {
    fn now_ms(&self) -> EpochMillis;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMillis {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as EpochMillis)
            .unwrap_or(0)
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub EpochMillis);

impl Clock for FixedClock {
    fn now_ms(&self) -> EpochMillis {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> EpochMillis,
{
    fn now_ms(&self) -> EpochMillis {
        self()
    }
}
