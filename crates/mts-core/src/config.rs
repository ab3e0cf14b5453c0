use std::time::Duration;

use rand::Rng;

/// Cycles assigned to every task before the random extra delay.
pub const DEFAULT_BASE_CYCLES: u64 = 1000;
/// Exclusive upper bound of the random extra delay, in cycles.
pub const DEFAULT_JITTER_BOUND: u64 = 2000;
/// Wall time a single simulated cycle lasts.
pub const DEFAULT_CYCLE: Duration = Duration::from_millis(1);

/// Simulation settings shared by every run of a [`crate::Simulator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub base_cycles: u64,
    pub jitter_bound: u64,
    pub cycle: Duration,
    /// How long the SMT pool is awaited before outstanding tasks are cancelled.
    ///
    /// `None` waits for as long as it takes.
    pub await_timeout: Option<Duration>,
    /// Cancels every outstanding task of a run once elapsed.
    pub run_timeout: Option<Duration>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            base_cycles: DEFAULT_BASE_CYCLES,
            jitter_bound: DEFAULT_JITTER_BOUND,
            cycle: DEFAULT_CYCLE,
            await_timeout: None,
            run_timeout: None,
        }
    }
}

impl SimConfig {
    pub fn with_base_cycles(mut self, cycles: u64) -> Self {
        self.base_cycles = cycles;
        self
    }

    pub fn with_jitter_bound(mut self, bound: u64) -> Self {
        self.jitter_bound = bound;
        self
    }

    pub fn with_cycle(mut self, cycle: Duration) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn with_await_timeout(mut self, timeout: Duration) -> Self {
        self.await_timeout = Some(timeout);
        self
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }

    #[inline]
    pub fn timing(&self) -> Timing {
        Timing {
            cycle: self.cycle,
            jitter_bound: self.jitter_bound,
        }
    }
}

/// Conversion between simulated cycles and wall time, plus the extra-delay distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub cycle: Duration,
    pub jitter_bound: u64,
}

impl Timing {
    /// Wall time `cycles` simulated cycles last. Saturates instead of overflowing.
    pub fn wall(&self, cycles: u64) -> Duration {
        let nanos = self.cycle.as_nanos().saturating_mul(u128::from(cycles));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Uniform draw from `[0, jitter_bound)`; always `0` when the bound is `0`.
    pub fn draw_extra(&self) -> u64 {
        if self.jitter_bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..self.jitter_bound)
    }
}
