use mts_model::{MetricsSnapshot, Model};
use serde::Serialize;
use uuid::Uuid;

/// Task that finished without recording anything, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    pub task: String,
    pub reason: String,
}

/// Everything a caller gets back from one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: Uuid,
    pub model: Model,
    /// Tasks in the batch.
    pub requested: usize,
    pub metrics: MetricsSnapshot,
    pub failures: Vec<TaskFailure>,
    /// Wall time between dispatch and the last join.
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Tasks that completed and were accounted for.
    #[inline]
    pub fn completed(&self) -> u64 {
        self.metrics.executed_instructions
    }

    /// `true` when at least one task of the batch failed.
    #[inline]
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
