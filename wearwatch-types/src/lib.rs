//! # wearwatch-types
//!
//! Core types for wearable telemetry projection. This crate defines the data
//! model shared by the projection engine and whatever renders its output:
//! decoded measurements, network log samples, query windows and chart points.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable `serde` to decode stored documents and emit chart data
//! - **Read-only inputs**: Measurements and logs are produced elsewhere and never mutated here
//! - **Ephemeral outputs**: Chart points are recomputed per window and never persisted
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use wearwatch_types::{Measurement, MeasurementValue, TimeWindow, DAY_MS};
//!
//! let m = Measurement::new(1_700_000_000_000, "wifi_connected", true.into())
//!     .with_outcome("Success");
//!
//! let window = TimeWindow::ending_at(1_700_000_500_000, DAY_MS);
//! assert!(window.contains(m.timestamp));
//! assert_eq!(m.value, MeasurementValue::Bool(true));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod measurement;
mod network;
mod point;
mod window;

pub use measurement::*;
pub use network::*;
pub use point::*;
pub use window::*;

/// Well-known event channel names emitted by the wearable firmware.
pub mod channels {
    pub const WIFI_CONNECTED: &str = "wifi_connected";
    pub const LOW_BATTERY: &str = "low_battery";
    pub const OFF_BODY: &str = "off_body";
    pub const PROBABLE_FALL: &str = "probable_fall";
    pub const BUTTON_PRESS: &str = "button_press";
    pub const NOTIFICATION_BUTTON_PRESS: &str = "notification_button_press";
}
