//! Cross-detector trigger exclusion.
//!
//! Several gesture detectors can run in the same process, each fed by its
//! own sample stream. One physical motion must never be interpreted as two
//! logical gestures, so every accepted trigger is serialized through a
//! single shared gate: the first source to claim it suppresses all others
//! for the exclusion window.

use crate::clock::{MonotonicClock, SystemClock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Suppression window after any accepted trigger, in milliseconds.
///
/// Deliberately longer than any single detector's internal debounce, so
/// the tail of the motion that fired one detector cannot fire another.
pub const EXCLUSION_WINDOW_MS: u64 = 1200;

/// Sentinel stamp meaning no trigger has ever been accepted.
const NEVER: u64 = u64::MAX;

/// Shared arbiter for gesture triggers.
///
/// Cloning is cheap and every clone observes the same state; pass one
/// handle to each detector and one to each confirmed-gesture callback.
/// The gate is explicitly constructed rather than global so tests can run
/// isolated instances side by side.
#[derive(Clone)]
pub struct TriggerGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    /// Monotonic ms stamp of the last accepted trigger, or `NEVER`.
    last_trigger_ms: AtomicU64,
    clock: Arc<dyn MonotonicClock>,
}

impl TriggerGate {
    /// Create a gate backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::start()))
    }

    /// Create a gate backed by the given clock.
    pub fn with_clock(clock: Arc<dyn MonotonicClock>) -> Self {
        Self {
            inner: Arc::new(GateInner {
                last_trigger_ms: AtomicU64::new(NEVER),
                clock,
            }),
        }
    }

    /// Atomically try to claim the trigger.
    ///
    /// Returns `false` without mutation while a previous claim is still
    /// inside the exclusion window. Denial is final for this call; there is
    /// no queuing. Linearizable across threads: of any set of concurrent
    /// claims, exactly one succeeds.
    pub fn claim_trigger(&self) -> bool {
        let now = self.inner.clock.now_ms();
        let mut last = self.inner.last_trigger_ms.load(Ordering::SeqCst);

        loop {
            if last != NEVER && now.saturating_sub(last) < EXCLUSION_WINDOW_MS {
                return false;
            }
            match self.inner.last_trigger_ms.compare_exchange(
                last,
                now,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(observed) => last = observed,
            }
        }
    }

    /// Whether a previously accepted trigger is still suppressing new ones.
    ///
    /// Side-effect-free single atomic load; cheap enough for the per-sample
    /// hot path.
    pub fn in_cooldown(&self) -> bool {
        let last = self.inner.last_trigger_ms.load(Ordering::SeqCst);
        last != NEVER && self.inner.clock.now_ms().saturating_sub(last) < EXCLUSION_WINDOW_MS
    }
}

impl Default for TriggerGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::thread;

    fn gate_with_manual_clock() -> (TriggerGate, ManualClock) {
        let clock = ManualClock::new();
        let gate = TriggerGate::with_clock(Arc::new(clock.clone()));
        (gate, clock)
    }

    #[test]
    fn test_first_claim_succeeds() {
        let (gate, _clock) = gate_with_manual_clock();
        assert!(!gate.in_cooldown());
        assert!(gate.claim_trigger());
    }

    #[test]
    fn test_second_claim_within_window_denied() {
        let (gate, clock) = gate_with_manual_clock();
        assert!(gate.claim_trigger());

        clock.advance_ms(1199);
        assert!(!gate.claim_trigger());
    }

    #[test]
    fn test_claim_after_window_elapsed_succeeds() {
        let (gate, clock) = gate_with_manual_clock();
        assert!(gate.claim_trigger());

        clock.advance_ms(EXCLUSION_WINDOW_MS);
        assert!(gate.claim_trigger());
    }

    #[test]
    fn test_denied_claim_does_not_extend_window() {
        let (gate, clock) = gate_with_manual_clock();
        assert!(gate.claim_trigger());

        clock.advance_ms(600);
        assert!(!gate.claim_trigger());

        // The denial at t=600 must not have reset the stamp
        clock.advance_ms(600);
        assert!(gate.claim_trigger());
    }

    #[test]
    fn test_cooldown_transitions() {
        let (gate, clock) = gate_with_manual_clock();
        assert!(gate.claim_trigger());
        assert!(gate.in_cooldown());

        clock.advance_ms(1199);
        assert!(gate.in_cooldown());

        clock.advance_ms(1);
        assert!(!gate.in_cooldown());
    }

    #[test]
    fn test_concurrent_claims_admit_one_winner() {
        let (gate, clock) = gate_with_manual_clock();
        clock.set_ms(5000);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                thread::spawn(move || gate.claim_trigger())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_clones_share_state() {
        let (gate, _clock) = gate_with_manual_clock();
        let clone = gate.clone();

        assert!(gate.claim_trigger());
        assert!(clone.in_cooldown());
        assert!(!clone.claim_trigger());
    }
}
