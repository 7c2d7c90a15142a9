//! Debounced autosave timer.
//!
//! Time is supplied by the caller in milliseconds (the browser passes
//! `performance.now()`), which keeps the timer deterministic under test.
//! Each `touch` cancels the pending deadline and starts a fresh quiet
//! period, so a burst of edits produces a single write after the last one.

#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    quiet_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0.0),
            deadline: None,
        }
    }

    /// Cancel-and-reschedule: the write is now due at `now + quiet_ms`.
    pub fn touch(&mut self, now: f64) {
        self.deadline = Some(now + self.quiet_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Whether the quiet period has elapsed at `now`.
    pub fn is_due(&self, now: f64) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Consume the pending deadline if it is due. Returns `true` exactly
    /// once per scheduled write.
    pub fn take_due(&mut self, now: f64) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Drop the pending deadline, returning whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
