use tokio::sync::mpsc;

use crate::{observer::Observer, simulator::RunReport, task::TaskOutcome};

/// Lifecycle notification as a value, for consumers living on another thread.
#[derive(Debug, Clone)]
pub enum RunEvent {
    TaskStarted { task: String },
    TaskFinished { task: String, outcome: TaskOutcome },
    RunCompleted(Box<RunReport>),
}

/// Observer that forwards every notification into an unbounded channel.
///
/// Sending never blocks the worker. Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Observer for ChannelObserver {
    fn on_task_started(&self, task: &str) {
        let _ = self.tx.send(RunEvent::TaskStarted {
            task: task.to_string(),
        });
    }

    fn on_task_finished(&self, task: &str, outcome: &TaskOutcome) {
        let _ = self.tx.send(RunEvent::TaskFinished {
            task: task.to_string(),
            outcome: outcome.clone(),
        });
    }

    fn on_run_completed(&self, report: &RunReport) {
        let _ = self.tx.send(RunEvent::RunCompleted(Box::new(report.clone())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskError;

    #[test]
    fn forwards_events_in_order() {
        let (obs, mut rx) = ChannelObserver::new();
        obs.on_task_started("BMT-1");
        obs.on_task_finished("BMT-1", &TaskOutcome::Failed(TaskError::Interrupted));

        match rx.try_recv().unwrap() {
            RunEvent::TaskStarted { task } => assert_eq!(task, "BMT-1"),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.try_recv().unwrap() {
            RunEvent::TaskFinished { task, outcome } => {
                assert_eq!(task, "BMT-1");
                assert_eq!(outcome, TaskOutcome::Failed(TaskError::Interrupted));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (obs, rx) = ChannelObserver::new();
        drop(rx);
        obs.on_task_started("SMT-0");
    }
}
