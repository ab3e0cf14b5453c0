use mts_core::{Observer, RunReport, TaskError, TaskOutcome};
use tracing::{debug, error, info, warn};

/// Kinds of lifecycle notifications, used to pick a message and a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    TaskStarted,
    TaskCompleted,
    TaskInterrupted,
    TaskNeverStarted,
    TaskPanicked,
    RunCompleted,
    RunPartial,
}

impl EventKind {
    pub fn of_outcome(outcome: &TaskOutcome) -> Self {
        match outcome {
            TaskOutcome::Completed { .. } => EventKind::TaskCompleted,
            TaskOutcome::Failed(TaskError::Interrupted) => EventKind::TaskInterrupted,
            TaskOutcome::Failed(TaskError::NeverStarted) => EventKind::TaskNeverStarted,
            TaskOutcome::Failed(TaskError::Panicked(_)) => EventKind::TaskPanicked,
        }
    }

    pub fn of_report(report: &RunReport) -> Self {
        if report.is_partial() {
            EventKind::RunPartial
        } else {
            EventKind::RunCompleted
        }
    }
}

#[inline]
pub fn message_for(kind: EventKind) -> &'static str {
    match kind {
        // task lifecycle
        EventKind::TaskStarted => "task started",
        EventKind::TaskCompleted => "task finished",
        EventKind::TaskInterrupted => "task interrupted before it could record its cycles",
        EventKind::TaskNeverStarted => "worker dropped before the task was started",
        EventKind::TaskPanicked => "worker panicked while running the task",

        // run
        EventKind::RunCompleted => "run completed",
        EventKind::RunPartial => "run completed with failed tasks",
    }
}

/// Observer writing every notification to `tracing`.
///
/// Starts and successful finishes log at `debug` so a plain `info` filter shows only run
/// summaries and failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn on_task_started(&self, task: &str) {
        debug!(task, "{}", message_for(EventKind::TaskStarted));
    }

    fn on_task_finished(&self, task: &str, outcome: &TaskOutcome) {
        let kind = EventKind::of_outcome(outcome);
        let msg = message_for(kind);

        match outcome {
            TaskOutcome::Completed { cycles } => debug!(task, cycles, "{msg}"),
            TaskOutcome::Failed(TaskError::Panicked(reason)) => {
                error!(task, reason = reason.as_str(), "{msg}")
            }
            TaskOutcome::Failed(_) => warn!(task, "{msg}"),
        }
    }

    fn on_run_completed(&self, report: &RunReport) {
        let msg = message_for(EventKind::of_report(report));
        let m = &report.metrics;

        if report.is_partial() {
            warn!(
                run_id = %report.run_id,
                model = report.model.as_str(),
                requested = report.requested,
                completed = report.completed(),
                failed = report.failures.len(),
                "{msg}"
            );
        } else {
            info!(
                run_id = %report.run_id,
                model = report.model.as_str(),
                total_cycles = m.total_cycles,
                executed_instructions = m.executed_instructions,
                bubble_cycles = m.bubble_cycles,
                ipc = m.ipc,
                elapsed_ms = report.elapsed_ms,
                "{msg}"
            );
        }
    }
}
