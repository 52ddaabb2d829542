//! Deadline-based interval timers
//!
//! Timers never sleep or spawn threads. A driver asks for the earliest
//! deadline, waits however it likes, and then fires whatever is due.

use std::time::{Duration, Instant};

/// Recurring timer driven by an external clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Duration,
    next: Option<Instant>,
}

impl IntervalTimer {
    /// Stopped timer with the given period
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Arm the timer; the first tick is one period after `now`
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    /// Disarm the timer
    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Whether the timer is armed
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.next.is_some()
    }

    /// Current period
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Change the period. An armed timer restarts from `now`.
    pub fn set_period(&mut self, period: Duration, now: Instant) {
        self.period = period;
        if self.is_active() {
            self.start(now);
        }
    }

    /// Consume a due tick. The next tick is scheduled one period after `now`,
    /// so ticks missed while the driver was busy collapse into one.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next {
            Some(deadline) if deadline <= now => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// When the timer next fires, if armed
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.next
    }
}
