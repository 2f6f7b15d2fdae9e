//! Shake gesture detection.
//!
//! Turns a stream of timestamped 3-axis acceleration samples into discrete
//! "triple shake" events. Each incoming sample is differenced against the
//! previous one to get a jerk magnitude; jerks above the configured
//! threshold are debounced and counted, and three qualifying impulses
//! inside a rolling one-second window confirm a gesture. Noise sources are
//! handled separately: mechanical bounce by the inter-impulse gap,
//! over-rate sample delivery by the sample-gap floor, and motions already
//! claimed by another gesture source by the shared [`TriggerGate`]
//! cooldown.

use crate::gesture::gate::TriggerGate;
use crate::gesture::timer::ResetScheduler;
use crate::sensor::types::AccelSample;
use std::time::Duration;
use tracing::debug;

/// Jerk threshold at sensitivity 1, the least sensitive setting.
const THRESHOLD_MAX: f32 = 45.0;

/// Threshold reduction per sensitivity step above 1.
const SENSITIVITY_STEP: f32 = 3.33;

/// Default user-facing sensitivity.
pub const DEFAULT_SENSITIVITY: u8 = 5;

/// Samples closer together than this are discarded as over-rate delivery.
///
/// A safety margin below the nominal ~16 Hz poll rate, not the primary
/// rate control.
pub const MIN_SAMPLE_GAP_MS: u64 = 20;

/// Impulses closer together than this are ignored as sensor bounce.
pub const MIN_INTER_IMPULSE_GAP_MS: u64 = 150;

/// Rolling window within which the full impulse count must accumulate.
pub const IMPULSE_WINDOW_MS: u64 = 1000;

/// Qualifying impulses required to confirm a gesture.
pub const IMPULSES_PER_GESTURE: u8 = 3;

/// Jerk threshold produced by a user-facing sensitivity level.
///
/// Levels outside 1..=10 are clamped before mapping. The mapping is
/// inverted relative to the user-facing scale: higher sensitivity means a
/// lower physical threshold, from 45.0 at level 1 down to ~15.0 at
/// level 10.
pub fn threshold_for_sensitivity(level: u8) -> f32 {
    let level = level.clamp(1, 10);
    THRESHOLD_MAX - f32::from(level - 1) * SENSITIVITY_STEP
}

/// Per-source shake detector.
///
/// One instance per gesture stream; the instance owns all of its counting
/// state and processes samples serially, so no locking is needed. The only
/// shared state is the [`TriggerGate`] handle. The confirmed-gesture
/// callback is responsible for calling [`TriggerGate::claim_trigger`]
/// before acting; the detector itself never claims.
pub struct ShakeDetector<S: ResetScheduler> {
    threshold: f32,
    last_sample: Option<AccelSample>,
    last_impulse_ms: Option<u64>,
    impulse_count: u8,
    reset_generation: u64,
    listening: bool,
    gate: TriggerGate,
    scheduler: S,
    on_gesture: Box<dyn FnMut() + Send>,

    // Session statistics
    impulses_counted: u64,
    gestures_confirmed: u64,
}

impl<S: ResetScheduler> ShakeDetector<S> {
    /// Create a detector at the default sensitivity.
    ///
    /// `on_gesture` is invoked synchronously from within sample processing
    /// each time a triple shake is confirmed.
    pub fn new(gate: TriggerGate, scheduler: S, on_gesture: Box<dyn FnMut() + Send>) -> Self {
        let mut detector = Self {
            threshold: 0.0,
            last_sample: None,
            last_impulse_ms: None,
            impulse_count: 0,
            reset_generation: 0,
            listening: false,
            gate,
            scheduler,
            on_gesture,
            impulses_counted: 0,
            gestures_confirmed: 0,
        };
        detector.configure_sensitivity(DEFAULT_SENSITIVITY);
        detector
    }

    /// Set the jerk threshold from a user-facing sensitivity level.
    ///
    /// See [`threshold_for_sensitivity`] for the mapping.
    pub fn configure_sensitivity(&mut self, level: u8) {
        self.threshold = threshold_for_sensitivity(level);
    }

    /// The current jerk threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Begin counting samples. Idempotent if already listening.
    pub fn start(&mut self) {
        if self.listening {
            return;
        }
        self.listening = true;
    }

    /// Stop counting and reset all counting state. Idempotent.
    pub fn stop(&mut self) {
        self.listening = false;
        self.reset_counting();
    }

    /// Alias for [`stop`](Self::stop), for callers tearing the detector
    /// down.
    pub fn cleanup(&mut self) {
        self.stop();
    }

    /// Whether the detector is currently counting.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Current partial impulse count (0..3).
    pub fn impulse_count(&self) -> u8 {
        self.impulse_count
    }

    /// Total qualifying impulses counted this session.
    pub fn impulses_counted(&self) -> u64 {
        self.impulses_counted
    }

    /// Total gestures confirmed this session.
    pub fn gestures_confirmed(&self) -> u64 {
        self.gestures_confirmed
    }

    /// The scheduler holding any armed reset deadline.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Process one accelerometer sample.
    pub fn on_sample(&mut self, sample: AccelSample) {
        if !self.listening {
            return;
        }

        // First sample since start: no delta is computable yet
        let Some(prev) = self.last_sample else {
            self.last_sample = Some(sample);
            return;
        };

        // Over-rate delivery; the discarded sample must not become the
        // delta base either
        if sample.elapsed_ms(&prev) < MIN_SAMPLE_GAP_MS {
            return;
        }

        let jerk = sample.jerk_from(&prev);

        if self.gate.in_cooldown() {
            // Another source just fired; abandon any partial count rather
            // than let it survive into a later, unrelated motion
            if self.impulse_count > 0 {
                debug!(
                    abandoned = self.impulse_count,
                    "partial count dropped during trigger cooldown"
                );
            }
            self.impulse_count = 0;
            self.last_sample = Some(sample);
            return;
        }

        if jerk > self.threshold {
            self.register_impulse(sample.timestamp_ms, jerk);
        }

        self.last_sample = Some(sample);
    }

    /// Host callback for an elapsed reset deadline.
    ///
    /// Ignored unless `generation` matches the most recently scheduled
    /// deadline; a stale delivery must not zero a count that has since
    /// progressed.
    pub fn on_reset_elapsed(&mut self, generation: u64) {
        if generation != self.reset_generation {
            return;
        }
        self.scheduler.cancel();
        self.impulse_count = 0;
    }

    fn register_impulse(&mut self, now_ms: u64, jerk: f32) {
        if let Some(last) = self.last_impulse_ms {
            if now_ms.saturating_sub(last) < MIN_INTER_IMPULSE_GAP_MS {
                return;
            }
        }

        self.impulse_count += 1;
        self.impulses_counted += 1;
        self.last_impulse_ms = Some(now_ms);
        self.scheduler.cancel();

        if self.impulse_count >= IMPULSES_PER_GESTURE {
            self.impulse_count = 0;
            self.gestures_confirmed += 1;
            debug!(jerk, "triple shake confirmed");
            (self.on_gesture)();
        } else {
            self.reset_generation += 1;
            self.scheduler.schedule(
                self.reset_generation,
                Duration::from_millis(IMPULSE_WINDOW_MS),
            );
        }
    }

    fn reset_counting(&mut self) {
        self.impulse_count = 0;
        self.last_sample = None;
        self.last_impulse_ms = None;
        self.scheduler.cancel();
    }
}
