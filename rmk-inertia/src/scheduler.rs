//! Cancellable delayed tick
//!
//! A `DelayedTick` only records when the next decay step of a channel is due.
//! The engine's run loop sleeps until the earliest deadline and then asks every
//! tick whether it is due, so cancelling is just clearing the deadline.
use embassy_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DelayedTick {
    deadline: Option<Instant>,
}

impl DelayedTick {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Schedule the tick `after` from `now`, replacing any pending deadline
    pub fn schedule(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    /// Drop the pending deadline, returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed at `now`
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The earlier of two optional deadlines
pub(crate) fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_fire() {
        let mut tick = DelayedTick::new();
        let start = Instant::from_millis(100);
        tick.schedule(start, Duration::from_millis(35));
        assert_eq!(tick.deadline(), Some(Instant::from_millis(135)));
        assert!(!tick.take_due(Instant::from_millis(134)));
        assert!(tick.take_due(Instant::from_millis(135)));
        // Firing consumes the deadline
        assert!(!tick.is_pending());
        assert!(!tick.take_due(Instant::from_millis(200)));
    }

    #[test]
    fn test_reschedule_replaces_deadline() {
        let mut tick = DelayedTick::new();
        tick.schedule(Instant::from_millis(0), Duration::from_millis(35));
        tick.schedule(Instant::from_millis(20), Duration::from_millis(35));
        assert!(!tick.take_due(Instant::from_millis(35)));
        assert!(tick.take_due(Instant::from_millis(55)));
    }

    #[test]
    fn test_cancel() {
        let mut tick = DelayedTick::new();
        assert!(!tick.cancel());
        tick.schedule(Instant::from_millis(0), Duration::from_millis(65));
        assert!(tick.cancel());
        assert!(!tick.take_due(Instant::from_millis(1000)));
    }

    #[test]
    fn test_earliest() {
        let a = Some(Instant::from_millis(10));
        let b = Some(Instant::from_millis(5));
        assert_eq!(earliest(a, b), b);
        assert_eq!(earliest(a, None), a);
        assert_eq!(earliest(None, b), b);
        assert_eq!(earliest(None, None), None);
    }
}
