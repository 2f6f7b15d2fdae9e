//! motiongate - shake-gesture recognition with cross-detector trigger
//! exclusion.
//!
//! This library turns raw accelerometer samples into discrete "triple
//! shake" events while preventing independently-running gesture detectors
//! from double-firing on the same physical motion.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       motiongate agent                         │
//! ├────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐    ┌──────────────┐    ┌─────────────┐        │
//! │  │   Sensor    │───▶│    Shake     │───▶│  confirmed  │        │
//! │  │ (IIO, 16Hz) │    │   Detector   │    │  callback   │        │
//! │  └─────────────┘    └──────┬───────┘    └──────┬──────┘        │
//! │                            │ in_cooldown?      │ claim_trigger │
//! │                            ▼                   ▼               │
//! │                     ┌─────────────────────────────┐            │
//! │                     │        TriggerGate          │            │
//! │                     │  (shared across all sources)│            │
//! │                     └─────────────────────────────┘            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The detector consumes a stream of timestamped samples, computes a jerk
//! metric from consecutive deltas, and debounces and counts qualifying
//! impulses inside a rolling window. The gate serializes accepted triggers
//! across every gesture source in the process; the confirmed-gesture
//! callback, not the detector, claims it before acting.
//!
//! # Example
//!
//! ```no_run
//! use motiongate::{DeadlineScheduler, ShakeDetector, TriggerGate};
//!
//! let gate = TriggerGate::new();
//! let action_gate = gate.clone();
//!
//! let mut detector = ShakeDetector::new(
//!     gate,
//!     DeadlineScheduler::new(),
//!     Box::new(move || {
//!         if action_gate.claim_trigger() {
//!             println!("triple shake!");
//!         }
//!     }),
//! );
//! detector.configure_sensitivity(7);
//! detector.start();
//!
//! // Samples are now fed to detector.on_sample(..) from the sensor stream
//! ```

pub mod clock;
pub mod config;
pub mod gesture;
pub mod logging;
pub mod sensor;

// Re-export key types at crate root for convenience
pub use clock::{ManualClock, MonotonicClock, SystemClock};
pub use config::{Config, ConfigError};
pub use gesture::{
    DeadlineScheduler, ResetScheduler, ShakeDetector, TriggerGate, EXCLUSION_WINDOW_MS,
};
pub use sensor::{AccelSample, Accelerometer, SensorConfig, SensorError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
