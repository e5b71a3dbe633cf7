//! Chart projection entry points.
//!
//! [`Projector`] ties the window selector, step projector and occurrence
//! merger together with an injected [`Clock`]. It holds no per-chart state;
//! windows are passed in on every call (see [`crate::charts::ChartWindows`]).

use tracing::debug;

use wearwatch_types::{EpochMillis, Measurement, OccurrencePoint, ProjectedPoint, TimeWindow, DAY_MS};

use crate::clock::Clock;
use crate::data::{merge, step, window, Labels};

/// Parameters shared by every projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Length of the rolling window in milliseconds.
    pub rolling_span: EpochMillis,
    /// Timestamp label formatting.
    pub labels: Labels,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            rolling_span: DAY_MS,
            labels: Labels::utc(),
        }
    }
}

/// Projects measurements into chart series.
#[derive(Debug, Clone)]
pub struct Projector<C> {
    clock: C,
    config: ProjectionConfig,
}

impl<C: Clock> Projector<C> {
    /// Create a projector with the default 24-hour rolling window, UTC labels.
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, ProjectionConfig::default())
    }

    pub fn with_config(clock: C, config: ProjectionConfig) -> Self {
        Self { clock, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Step series for one event type.
    ///
    /// With a window, selects the events inside it and emits `2n - 1` points.
    /// Without one, uses the rolling window ending at the type's latest
    /// event, carries the last older state forward to the cutoff and extends
    /// the final value to the clock's current instant (`2n` points).
    pub fn project(
        &self,
        measurements: &[Measurement],
        kind: &str,
        window: Option<&TimeWindow>,
    ) -> Vec<ProjectedPoint> {
        let events = window::select(measurements, kind, window, self.config.rolling_span);
        let trailing = match window {
            Some(_) => None,
            None => Some(self.clock.now_ms()),
        };
        let points = step::step_points(&events, &self.config.labels, trailing);

        debug!(
            kind,
            rolling = window.is_none(),
            events = events.len(),
            points = points.len(),
            "Projected step series"
        );
        points
    }

    /// Occurrence series across several event types.
    ///
    /// Each type is windowed independently, without carry-forward. Repeated
    /// type names collapse to one column.
    pub fn merge_occurrences(
        &self,
        measurements: &[Measurement],
        kinds: &[&str],
        window: Option<&TimeWindow>,
    ) -> Vec<OccurrencePoint> {
        let kinds = merge::distinct_kinds(kinds);
        let series: Vec<Vec<Measurement>> = kinds
            .iter()
            .map(|kind| match window {
                Some(w) => window::select_explicit(measurements, kind, w),
                None => window::select_recent(measurements, kind, self.config.rolling_span),
            })
            .collect();
        let points = merge::merge_series(&kinds, &series, &self.config.labels);

        debug!(
            kinds = ?kinds,
            rolling = window.is_none(),
            points = points.len(),
            "Merged occurrence series"
        );
        points
    }
}
