//! Deadline debouncing over host-supplied timestamps.
//!
//! The engine never reads the wall clock; the host passes `now_ms` into
//! every time-sensitive entry point, which keeps debounce behavior
//! deterministic under test.

/// Fires once per arming, after `delay_ms` of quiet.
///
/// Re-triggering before the deadline pushes the deadline out, so the wrapped
/// action runs only when the signal has been silent for the full delay.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms, deadline: None }
    }

    /// Arm (or re-arm) the deadline at `now_ms + delay`.
    pub fn trigger(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once after the quiet period elapses.
    pub fn fire_if_due(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
