//! Cooperative slice scheduler.
//!
//! A [`BatchRun`] holds a snapshot of the work items and advances one slice
//! per `run_slice` call; the caller owns the yield points (the engine pumps
//! one slice per tick). No host timer or task queue is assumed.

use log::warn;

/// Slice size when the config does not override it.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Item counts at or below this are processed synchronously in one pass
/// instead of being sliced.
pub const BATCH_ACTIVATION_THRESHOLD: usize = 100;

/// Per-item failures are logged individually only this many times.
const STEP_WARN_CAP: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchStatus {
    /// Slices remain; call `run_slice` again after yielding.
    Pending,
    /// The final slice has been processed.
    Done,
}

/// A resumable pass of `step` over `items`, `batch_size` at a time.
///
/// Results come out in input order; a failing item is skipped and never
/// aborts its slice. The items are a snapshot taken at construction;
/// collection edits made mid-run are not observed.
pub struct BatchRun<T, U> {
    items: Vec<T>,
    results: Vec<U>,
    cursor: usize,
    batch_size: usize,
    last_slice_start: usize,
    failures: u32,
}

impl<T, U> BatchRun<T, U> {
    pub fn new(items: Vec<T>, batch_size: usize) -> Self {
        Self {
            items,
            results: Vec::new(),
            cursor: 0,
            batch_size: batch_size.max(1),
            last_slice_start: 0,
            failures: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Items that produced no result so far.
    pub fn failure_count(&self) -> u32 {
        self.failures
    }

    /// Process the next slice synchronously, in input order.
    pub fn run_slice(&mut self, step: &mut dyn FnMut(&T) -> Result<U, String>) -> BatchStatus {
        self.last_slice_start = self.results.len();
        let end = (self.cursor + self.batch_size).min(self.items.len());
        for item in &self.items[self.cursor..end] {
            match step(item) {
                Ok(out) => self.results.push(out),
                Err(err) => {
                    if self.failures < STEP_WARN_CAP {
                        warn!("batch step failed, item skipped: {err}");
                    }
                    self.failures += 1;
                }
            }
        }
        self.cursor = end;
        if self.is_done() {
            BatchStatus::Done
        } else {
            BatchStatus::Pending
        }
    }

    /// Results produced by the most recent `run_slice` call, for
    /// incremental per-slice consumers.
    pub fn last_slice(&self) -> &[U] {
        &self.results[self.last_slice_start..]
    }

    /// Everything produced so far.
    pub fn results(&self) -> &[U] {
        &self.results
    }

    pub fn into_results(self) -> Vec<U> {
        self.results
    }

    /// Drive every slice back-to-back. The synchronous bypass for small
    /// inputs, and a convenience for tests.
    pub fn run_to_completion(mut self, step: &mut dyn FnMut(&T) -> Result<U, String>) -> Vec<U> {
        while self.run_slice(step) == BatchStatus::Pending {}
        self.results
    }
}
