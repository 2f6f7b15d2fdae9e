//! Gesture recognition core: shake detection and cross-detector trigger
//! exclusion.

pub mod detector;
pub mod gate;
pub mod timer;

// Re-export commonly used types
pub use detector::{
    threshold_for_sensitivity, ShakeDetector, DEFAULT_SENSITIVITY, IMPULSES_PER_GESTURE,
    IMPULSE_WINDOW_MS, MIN_INTER_IMPULSE_GAP_MS, MIN_SAMPLE_GAP_MS,
};
pub use gate::{TriggerGate, EXCLUSION_WINDOW_MS};
pub use timer::{DeadlineScheduler, ResetScheduler};
