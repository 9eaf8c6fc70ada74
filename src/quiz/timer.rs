use std::time::{Duration, Instant};

/// A single pending deadline. Scheduling replaces whatever was pending, so a
/// superseded deadline can never fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deadline {
    due: Option<Instant>,
}

impl Deadline {
    pub fn schedule(&mut self, now: Instant, after: Duration) {
        self.due = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Returns true once when `now` has reached the deadline, then disarms.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
