use std::sync::atomic::{AtomicU64, Ordering};

use mts_model::{MetricsSnapshot, ipc_of};

/// Counters of one simulation run.
///
/// Shared by every task of the run through an `Arc`. Increments are atomic so no update is
/// lost however many workers record at once. Reads are only meaningful once every writer has
/// been joined; use [`Metrics::snapshot`] to hand the result off.
#[derive(Debug, Default)]
pub struct Metrics {
    total_cycles: AtomicU64,
    executed_instructions: AtomicU64,
    bubble_cycles: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_cycles(&self, n: u64) {
        self.total_cycles.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_instruction(&self, k: u64) {
        self.executed_instructions.fetch_add(k, Ordering::Relaxed);
    }

    /// Reserved for idle/stall accounting. No dispatcher calls it yet.
    #[inline]
    pub fn record_bubble(&self, n: u64) {
        self.bubble_cycles.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn executed_instructions(&self) -> u64 {
        self.executed_instructions.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bubble_cycles(&self) -> u64 {
        self.bubble_cycles.load(Ordering::Relaxed)
    }

    /// Instructions per cycle; `0.0` when no cycle was recorded.
    pub fn ipc(&self) -> f64 {
        ipc_of(self.executed_instructions(), self.total_cycles())
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::new(
            self.total_cycles(),
            self.executed_instructions(),
            self.bubble_cycles(),
        )
    }
}
