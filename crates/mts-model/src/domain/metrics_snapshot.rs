use serde::{Deserialize, Serialize};

/// Value returned by [`ipc_of`] when no cycle was recorded.
pub const IPC_UNDEFINED: f64 = 0.0;

/// Instructions per cycle, or [`IPC_UNDEFINED`] when `cycles == 0`.
#[inline]
pub fn ipc_of(instructions: u64, cycles: u64) -> f64 {
    if cycles == 0 {
        return IPC_UNDEFINED;
    }
    instructions as f64 / cycles as f64
}

/// Read-only copy of a run's counters, taken after every worker joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Sum of the cycle contributions of every completed task.
    pub total_cycles: u64,
    /// One per completed task.
    pub executed_instructions: u64,
    /// Reserved for idle/stall accounting; no dispatcher fills it yet.
    pub bubble_cycles: u64,
    pub ipc: f64,
}

impl MetricsSnapshot {
    pub fn new(total_cycles: u64, executed_instructions: u64, bubble_cycles: u64) -> Self {
        Self {
            total_cycles,
            executed_instructions,
            bubble_cycles,
            ipc: ipc_of(executed_instructions, total_cycles),
        }
    }
}
