//! Monotonic clock abstraction.
//!
//! Every timing decision in the gesture engine compares monotonic
//! millisecond stamps. The trigger gate reads its stamps through this
//! trait so tests can drive cooldown windows with a manual clock instead
//! of real wall-clock waits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of monotonic millisecond timestamps.
pub trait MonotonicClock: Send + Sync {
    /// Milliseconds elapsed since the clock's epoch.
    fn now_ms(&self) -> u64;
}

/// A monotonic clock anchored to a fixed epoch (the moment it was created).
///
/// Clones share the epoch, so timestamps taken through any clone are
/// directly comparable.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// A manually advanced clock for deterministic tests.
///
/// Clones share the underlying counter, so a test can hand one clone to a
/// gate and keep another to advance time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current time in milliseconds.
    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }

    /// Advance the current time by `ms` milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_starts_near_zero() {
        let clock = SystemClock::start();
        // Should be very small but non-negative
        assert!(clock.now_ms() < 1000);
    }

    #[test]
    fn test_system_clock_clones_share_epoch() {
        let clock = SystemClock::start();
        let clone = clock.clone();
        let a = clock.now_ms();
        let b = clone.now_ms();
        assert!(b >= a);
        assert!(b - a < 1000);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0);

        clock.advance_ms(250);
        assert_eq!(clock.now_ms(), 250);

        let clone = clock.clone();
        clone.advance_ms(50);
        assert_eq!(clock.now_ms(), 300);

        clock.set_ms(1200);
        assert_eq!(clone.now_ms(), 1200);
    }
}
