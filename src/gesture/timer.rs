//! Deferred-reset capability for the detector's rolling window.
//!
//! The detector never touches wall-clock timers directly. It asks a
//! [`ResetScheduler`] to arm a deadline and tags each request with a
//! generation number; the host delivers an elapsed deadline back through
//! [`crate::gesture::ShakeDetector::on_reset_elapsed`] with the same
//! generation, so a deadline superseded after firing is discarded instead
//! of zeroing a count that has since progressed.

use std::time::{Duration, Instant};

/// Host-provided deferred-callback capability.
///
/// `schedule` supersedes any outstanding deadline, so at most one reset is
/// pending per detector. Scheduling cannot fail.
pub trait ResetScheduler: Send {
    /// Arm a reset notification after `delay`, replacing any pending one.
    fn schedule(&mut self, generation: u64, delay: Duration);

    /// Clear the pending notification, if any.
    fn cancel(&mut self);
}

/// Scheduler that records the armed deadline for a polling event loop.
///
/// The agent loop converts the armed deadline into a
/// `crossbeam_channel::at` receiver it selects on alongside the sample
/// stream, then reports the elapsed generation back to the detector.
#[derive(Debug, Default)]
pub struct DeadlineScheduler {
    armed: Option<(u64, Instant)>,
}

impl DeadlineScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently armed deadline, if any.
    pub fn armed(&self) -> Option<(u64, Instant)> {
        self.armed
    }
}

impl ResetScheduler for DeadlineScheduler {
    fn schedule(&mut self, generation: u64, delay: Duration) {
        self.armed = Some((generation, Instant::now() + delay));
    }

    fn cancel(&mut self) {
        self.armed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_supersedes() {
        let mut scheduler = DeadlineScheduler::new();
        assert!(scheduler.armed().is_none());

        scheduler.schedule(1, Duration::from_millis(1000));
        let (gen, first_deadline) = scheduler.armed().unwrap();
        assert_eq!(gen, 1);

        scheduler.schedule(2, Duration::from_millis(1000));
        let (gen, second_deadline) = scheduler.armed().unwrap();
        assert_eq!(gen, 2);
        assert!(second_deadline >= first_deadline);
    }

    #[test]
    fn test_cancel_clears() {
        let mut scheduler = DeadlineScheduler::new();
        scheduler.schedule(7, Duration::from_millis(1000));
        scheduler.cancel();
        assert!(scheduler.armed().is_none());
    }
}
