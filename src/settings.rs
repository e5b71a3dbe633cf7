//! Layered settings for the harness.
//!
//! Values come from an optional TOML file overlaid with `WEARWATCH_*`
//! environment variables:
//!
//! ```toml
//! rolling_window_hours = 24
//! collision_policy = "offset"   # or "merge"
//! utc_offset_minutes = 60
//! log_filter = "wearwatch=debug"
//! log_page_size = 500
//! ```
//!
//! `WEARWATCH_UTC_OFFSET_MINUTES=-300` overrides the file.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use wearwatch_types::{EpochMillis, HOUR_MS};

use crate::data::{CollisionPolicy, Labels, ReconcileOptions};
use crate::engine::ProjectionConfig;
use crate::error::WearwatchError;

/// Settings file read when no path is given. Missing is fine.
pub const DEFAULT_SETTINGS_FILE: &str = "wearwatch.toml";

const ENV_PREFIX: &str = "WEARWATCH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Length of the rolling chart window.
    pub rolling_window_hours: u32,
    pub collision_policy: CollisionPolicy,
    /// Fixed offset east of UTC for chart labels.
    pub utc_offset_minutes: i32,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Cap on reconciled network samples, as the query service pages them.
    pub log_page_size: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rolling_window_hours: 24,
            collision_policy: CollisionPolicy::default(),
            utc_offset_minutes: 0,
            log_filter: "info".to_string(),
            log_page_size: None,
        }
    }
}

impl Settings {
    /// Load settings from `path` (required) or the default file (optional),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, WearwatchError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self, WearwatchError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_SETTINGS_FILE)).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), WearwatchError> {
        if self.rolling_window_hours == 0 {
            return Err(WearwatchError::InvalidSetting(
                "rolling_window_hours must be at least 1".to_string(),
            ));
        }
        self.labels().map(|_| ())
    }

    pub fn rolling_span(&self) -> EpochMillis {
        EpochMillis::from(self.rolling_window_hours) * HOUR_MS
    }

    pub fn labels(&self) -> Result<Labels, WearwatchError> {
        Labels::with_offset_minutes(self.utc_offset_minutes).ok_or_else(|| {
            WearwatchError::InvalidSetting(format!(
                "utc_offset_minutes {} is not within one day",
                self.utc_offset_minutes
            ))
        })
    }

    pub fn projection_config(&self) -> Result<ProjectionConfig, WearwatchError> {
        Ok(ProjectionConfig {
            rolling_span: self.rolling_span(),
            labels: self.labels()?,
        })
    }

    /// Reconcile options from settings; the network type filter is per call.
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            policy: self.collision_policy,
            network_type: None,
            limit: self.log_page_size,
        }
    }
}
