//! Accelerometer sampling for the motiongate agent.
//!
//! This module provides platform-specific sources that deliver timestamped
//! 3-axis acceleration samples over a bounded channel.

pub mod types;

#[cfg(target_os = "linux")]
pub mod iio;

#[cfg(not(target_os = "linux"))]
pub mod noop;

// Re-export commonly used types
pub use types::AccelSample;

#[cfg(target_os = "linux")]
pub use iio::{IioAccelerometer, SensorConfig, SensorError};

/// Platform-agnostic accelerometer type alias
#[cfg(target_os = "linux")]
pub type Accelerometer = IioAccelerometer;

#[cfg(not(target_os = "linux"))]
pub use noop::{NoopAccelerometer, SensorConfig, SensorError};

/// Platform-agnostic accelerometer type alias
#[cfg(not(target_os = "linux"))]
pub type Accelerometer = NoopAccelerometer;
