//! Integration tests for cross-detector trigger coordination.
//!
//! Two independent shake detectors share one trigger gate. The first
//! source to confirm a gesture claims the gate from its callback and
//! suppresses every source, including itself, for the exclusion window.

use motiongate::{AccelSample, DeadlineScheduler, ManualClock, ShakeDetector, TriggerGate};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

struct Source {
    detector: ShakeDetector<DeadlineScheduler>,
    fired: Arc<AtomicU32>,
    accepted: Arc<AtomicU32>,
}

/// A listening detector at sensitivity 7 (jerk threshold ~25) whose
/// callback claims the shared gate, mirroring how a real downstream
/// action must behave.
fn source(gate: &TriggerGate) -> Source {
    let fired = Arc::new(AtomicU32::new(0));
    let accepted = Arc::new(AtomicU32::new(0));
    let cb_gate = gate.clone();
    let cb_fired = fired.clone();
    let cb_accepted = accepted.clone();

    let mut detector = ShakeDetector::new(
        gate.clone(),
        DeadlineScheduler::new(),
        Box::new(move || {
            cb_fired.fetch_add(1, Ordering::SeqCst);
            if cb_gate.claim_trigger() {
                cb_accepted.fetch_add(1, Ordering::SeqCst);
            }
        }),
    );
    detector.configure_sensitivity(7);
    detector.start();

    Source {
        detector,
        fired,
        accepted,
    }
}

fn shared_gate() -> (TriggerGate, ManualClock) {
    let clock = ManualClock::new();
    let gate = TriggerGate::with_clock(Arc::new(clock.clone()));
    (gate, clock)
}

/// Feed a sample whose x value alternates by index, producing a jerk of 30
/// at every step. The manual clock follows the sample timestamps so the
/// gate and the sample stream agree about "now".
fn feed(src: &mut Source, clock: &ManualClock, index: usize, t: u64) {
    clock.set_ms(t);
    let x = if index % 2 == 0 { 0.0 } else { 30.0 };
    src.detector.on_sample(AccelSample::new(x, 0.0, 9.81, t));
}

#[test]
fn first_source_to_confirm_suppresses_the_other() {
    let (gate, clock) = shared_gate();
    let mut a = source(&gate);
    let mut b = source(&gate);

    // Source A confirms a triple shake; its callback claims the gate
    for (i, t) in [0u64, 200, 400, 600].into_iter().enumerate() {
        feed(&mut a, &clock, i, t);
    }
    assert_eq!(a.fired.load(Ordering::SeqCst), 1);
    assert_eq!(a.accepted.load(Ordering::SeqCst), 1);

    // Source B sees only the cooldown: vigorous motion counts nothing
    for (i, t) in [700u64, 900, 1100, 1300].into_iter().enumerate() {
        feed(&mut b, &clock, i, t);
    }
    assert_eq!(b.fired.load(Ordering::SeqCst), 0);
    assert_eq!(b.detector.impulse_count(), 0);

    // Once the window lapses, B can confirm and claim
    for (i, t) in [1900u64, 2100, 2300].into_iter().enumerate() {
        feed(&mut b, &clock, i + 4, t);
    }
    assert_eq!(b.fired.load(Ordering::SeqCst), 1);
    assert_eq!(b.accepted.load(Ordering::SeqCst), 1);
}

#[test]
fn partial_count_is_abandoned_when_another_source_claims() {
    let (gate, clock) = shared_gate();
    let mut a = source(&gate);
    let mut b = source(&gate);

    // Interleaved motion drives both counters up; A reaches three first
    feed(&mut a, &clock, 0, 0);
    feed(&mut b, &clock, 0, 100);
    feed(&mut a, &clock, 1, 200);
    feed(&mut b, &clock, 1, 250);
    feed(&mut a, &clock, 2, 400);
    feed(&mut b, &clock, 2, 450);
    assert_eq!(b.detector.impulse_count(), 2);

    feed(&mut a, &clock, 3, 600);
    assert_eq!(a.accepted.load(Ordering::SeqCst), 1);

    // B's next qualifying sample observes the cooldown and abandons its
    // partial count instead of completing a phantom gesture
    feed(&mut b, &clock, 3, 650);
    assert_eq!(b.detector.impulse_count(), 0);
    assert_eq!(b.fired.load(Ordering::SeqCst), 0);
}

#[test]
fn a_source_cannot_refire_inside_its_own_cooldown() {
    let (gate, clock) = shared_gate();
    let mut a = source(&gate);

    for (i, t) in [0u64, 200, 400, 600].into_iter().enumerate() {
        feed(&mut a, &clock, i, t);
    }
    assert_eq!(a.accepted.load(Ordering::SeqCst), 1);

    // Continued shaking inside the exclusion window counts nothing, even
    // for the source that fired
    for (i, t) in [750u64, 950, 1150, 1350].into_iter().enumerate() {
        feed(&mut a, &clock, i + 4, t);
    }
    assert_eq!(a.fired.load(Ordering::SeqCst), 1);
    assert_eq!(a.detector.impulse_count(), 0);

    // A fresh triple after the window confirms and claims again
    for (i, t) in [1900u64, 2100, 2300].into_iter().enumerate() {
        feed(&mut a, &clock, i, t);
    }
    assert_eq!(a.fired.load(Ordering::SeqCst), 2);
    assert_eq!(a.accepted.load(Ordering::SeqCst), 2);
}
