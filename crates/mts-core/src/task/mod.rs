use std::sync::{Arc, OnceLock};

use tokio::{sync::oneshot, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    config::Timing,
    error::TaskError,
    metrics::Metrics,
    observer::{Observer, notify_guarded, panic_message},
};

/// State every task of a run shares with its siblings.
pub struct TaskEnv {
    metrics: Arc<Metrics>,
    observer: Arc<dyn Observer>,
    cancel: CancellationToken,
    timing: Timing,
}

impl TaskEnv {
    pub fn new(
        metrics: Arc<Metrics>,
        observer: Arc<dyn Observer>,
        cancel: CancellationToken,
        timing: Timing,
    ) -> Self {
        Self {
            metrics,
            observer,
            cancel,
            timing,
        }
    }

    #[inline]
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    #[inline]
    pub fn observer(&self) -> &Arc<dyn Observer> {
        &self.observer
    }

    #[inline]
    pub fn timing(&self) -> Timing {
        self.timing
    }
}

/// Terminal state of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task slept through its cycles and recorded them.
    Completed { cycles: u64 },
    /// The task recorded nothing.
    Failed(TaskError),
}

impl TaskOutcome {
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskOutcome::Completed { .. })
    }

    pub fn cycles(&self) -> Option<u64> {
        match self {
            TaskOutcome::Completed { cycles } => Some(*cycles),
            TaskOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&TaskError> {
        match self {
            TaskOutcome::Completed { .. } => None,
            TaskOutcome::Failed(e) => Some(e),
        }
    }
}

impl From<&Result<u64, TaskError>> for TaskOutcome {
    fn from(res: &Result<u64, TaskError>) -> Self {
        match res {
            Ok(cycles) => TaskOutcome::Completed { cycles: *cycles },
            Err(e) => TaskOutcome::Failed(e.clone()),
        }
    }
}

impl From<Result<u64, TaskError>> for TaskOutcome {
    fn from(res: Result<u64, TaskError>) -> Self {
        match res {
            Ok(cycles) => TaskOutcome::Completed { cycles },
            Err(e) => TaskOutcome::Failed(e),
        }
    }
}

/// Outcome of one task as collected by a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub task: String,
    pub outcome: TaskOutcome,
}

/// One unit of simulated work.
///
/// Lasts `base_cycles` plus an extra delay drawn once, when execution starts. A completed task
/// contributes its cycles and exactly one instruction to the run's [`Metrics`].
pub struct Task {
    name: String,
    base_cycles: u64,
    extra_cycles: OnceLock<u64>,
    env: Arc<TaskEnv>,
}

impl Task {
    pub fn new(name: impl Into<String>, base_cycles: u64, env: Arc<TaskEnv>) -> Self {
        Self {
            name: name.into(),
            base_cycles,
            extra_cycles: OnceLock::new(),
            env,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn base_cycles(&self) -> u64 {
        self.base_cycles
    }

    /// Extra delay realized by [`Task::execute`]; `None` until the task started.
    #[inline]
    pub fn extra_cycles(&self) -> Option<u64> {
        self.extra_cycles.get().copied()
    }

    /// Run the task on the calling worker.
    ///
    /// Notifies the observer, draws the extra delay, waits `base + extra` cycles of wall time
    /// and then records the cycles and one instruction. The wait is the only suspension point;
    /// when the run is cancelled during it nothing is recorded and
    /// [`TaskError::Interrupted`] is returned.
    ///
    /// A panic in the start notification fails the task before anything is recorded. The finish
    /// notification is sent once the outcome is final, so a panic there cannot change it.
    pub async fn execute(&self) -> Result<u64, TaskError> {
        let env = &self.env;
        env.observer.on_task_started(&self.name);

        let extra = *self.extra_cycles.get_or_init(|| env.timing.draw_extra());
        let cycles = self.base_cycles.saturating_add(extra);
        trace!(task = %self.name, base = self.base_cycles, extra, "task executing");

        let res = tokio::select! {
            biased;
            _ = env.cancel.cancelled() => Err(TaskError::Interrupted),
            _ = tokio::time::sleep(env.timing.wall(cycles)) => {
                env.metrics.record_cycles(cycles);
                env.metrics.record_instruction(1);
                Ok(cycles)
            }
        };

        if let Err(e) = &res {
            debug!(task = %self.name, reason = %e, "task did not complete");
        }
        let outcome = TaskOutcome::from(&res);
        notify_guarded("on_task_finished", || {
            env.observer.on_task_finished(&self.name, &outcome)
        });
        res
    }

    /// Spawn the task onto the current runtime; it starts right away.
    pub fn spawn(self) -> TaskHandle {
        self.spawn_inner(None)
    }

    /// Spawn the task onto the current runtime, parked until `gate` fires.
    ///
    /// Dropping the sender instead finishes the task with [`TaskError::NeverStarted`].
    pub fn spawn_gated(self, gate: oneshot::Receiver<()>) -> TaskHandle {
        self.spawn_inner(Some(gate))
    }

    fn spawn_inner(self, gate: Option<oneshot::Receiver<()>>) -> TaskHandle {
        let name = self.name.clone();
        let observer = Arc::clone(&self.env.observer);

        let inner = tokio::spawn(async move {
            if let Some(gate) = gate {
                if gate.await.is_err() {
                    let err = TaskError::NeverStarted;
                    let outcome = TaskOutcome::Failed(err.clone());
                    notify_guarded("on_task_finished", || {
                        self.env.observer.on_task_finished(&self.name, &outcome)
                    });
                    return Err(err);
                }
            }
            self.execute().await
        });

        TaskHandle {
            name,
            observer,
            inner,
        }
    }
}

/// Join handle of a spawned [`Task`].
pub struct TaskHandle {
    name: String,
    observer: Arc<dyn Observer>,
    inner: JoinHandle<Result<u64, TaskError>>,
}

impl TaskHandle {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the task and turn whatever happened to it into a report.
    ///
    /// A panicking worker is isolated here: it becomes [`TaskError::Panicked`] and the observer
    /// gets the finish notification the worker could not send.
    pub async fn join(self) -> TaskReport {
        let outcome = match self.inner.await {
            Ok(res) => TaskOutcome::from(res),
            Err(e) => {
                let err = if e.is_panic() {
                    TaskError::Panicked(panic_message(e.into_panic()))
                } else {
                    TaskError::Interrupted
                };
                warn!(task = %self.name, reason = %err, "worker terminated abnormally");
                let outcome = TaskOutcome::Failed(err);
                notify_guarded("on_task_finished", || {
                    self.observer.on_task_finished(&self.name, &outcome)
                });
                outcome
            }
        };

        TaskReport {
            task: self.name,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Observer for Recorder {
        fn on_task_started(&self, task: &str) {
            self.events.lock().unwrap().push(format!("start {task}"));
        }
        fn on_task_finished(&self, task: &str, outcome: &TaskOutcome) {
            let state = if outcome.is_completed() { "ok" } else { "failed" };
            self.events
                .lock()
                .unwrap()
                .push(format!("finish {task} {state}"));
        }
    }

    struct PanicOnStart;

    impl Observer for PanicOnStart {
        fn on_task_started(&self, _task: &str) {
            panic!("boom");
        }
    }

    /// Panics on the first finish notification it receives.
    struct PanicOnFinish;

    impl Observer for PanicOnFinish {
        fn on_task_finished(&self, _task: &str, _outcome: &TaskOutcome) {
            panic!("observer boom");
        }
    }

    fn env(observer: Arc<dyn Observer>, cancel: CancellationToken, jitter: u64) -> Arc<TaskEnv> {
        let timing = Timing {
            cycle: Duration::from_millis(1),
            jitter_bound: jitter,
        };
        Arc::new(TaskEnv::new(
            Arc::new(Metrics::new()),
            observer,
            cancel,
            timing,
        ))
    }

    #[tokio::test]
    async fn execute_records_cycles_and_one_instruction() {
        let rec = Arc::new(Recorder::default());
        let env = env(rec.clone(), CancellationToken::new(), 4);
        let task = Task::new("SMT-0", 3, Arc::clone(&env));
        assert_eq!(task.extra_cycles(), None);

        let cycles = task.execute().await.unwrap();

        assert!((3..7).contains(&cycles));
        assert_eq!(task.extra_cycles(), Some(cycles - 3));
        assert_eq!(env.metrics().total_cycles(), cycles);
        assert_eq!(env.metrics().executed_instructions(), 1);
        assert_eq!(rec.events(), vec!["start SMT-0", "finish SMT-0 ok"]);
    }

    #[tokio::test]
    async fn cancelled_task_records_nothing() {
        let rec = Arc::new(Recorder::default());
        let cancel = CancellationToken::new();
        let env = env(rec.clone(), cancel.clone(), 0);
        let task = Task::new("IMT-0", 60_000, Arc::clone(&env));

        let handle = task.spawn();
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();
        let report = handle.join().await;

        assert_eq!(report.task, "IMT-0");
        assert_eq!(report.outcome, TaskOutcome::Failed(TaskError::Interrupted));
        assert_eq!(env.metrics().total_cycles(), 0);
        assert_eq!(env.metrics().executed_instructions(), 0);
        assert_eq!(rec.events(), vec!["start IMT-0", "finish IMT-0 failed"]);
    }

    #[tokio::test]
    async fn already_cancelled_run_skips_the_wait() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let env = env(Arc::new(Recorder::default()), cancel, 0);
        let task = Task::new("BMT-0", 0, Arc::clone(&env));

        assert_eq!(task.execute().await, Err(TaskError::Interrupted));
        assert_eq!(env.metrics().executed_instructions(), 0);
    }

    #[tokio::test]
    async fn gated_task_waits_for_gate() {
        let rec = Arc::new(Recorder::default());
        let env = env(rec.clone(), CancellationToken::new(), 0);
        let (tx, rx) = oneshot::channel();

        let handle = Task::new("BMT-0", 1, Arc::clone(&env)).spawn_gated(rx);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(rec.events().is_empty());

        tx.send(()).unwrap();
        let report = handle.join().await;
        assert_eq!(report.outcome, TaskOutcome::Completed { cycles: 1 });
        assert_eq!(env.metrics().executed_instructions(), 1);
    }

    #[tokio::test]
    async fn dropped_gate_never_starts() {
        let rec = Arc::new(Recorder::default());
        let env = env(rec.clone(), CancellationToken::new(), 0);
        let (tx, rx) = oneshot::channel::<()>();

        let handle = Task::new("BMT-1", 1, Arc::clone(&env)).spawn_gated(rx);
        drop(tx);
        let report = handle.join().await;

        assert_eq!(report.outcome, TaskOutcome::Failed(TaskError::NeverStarted));
        assert_eq!(env.metrics().executed_instructions(), 0);
        assert_eq!(rec.events(), vec!["finish BMT-1 failed"]);
    }

    #[tokio::test]
    async fn panicking_worker_is_reported() {
        let env = env(Arc::new(PanicOnStart), CancellationToken::new(), 0);
        let report = Task::new("SMT-3", 1, Arc::clone(&env)).spawn().join().await;

        assert_eq!(report.task, "SMT-3");
        assert_eq!(
            report.outcome,
            TaskOutcome::Failed(TaskError::Panicked("boom".into()))
        );
        assert_eq!(env.metrics().executed_instructions(), 0);
    }

    #[tokio::test]
    async fn panicking_finish_callback_keeps_the_result() {
        let env = env(Arc::new(PanicOnFinish), CancellationToken::new(), 0);
        let report = Task::new("IMT-0", 2, Arc::clone(&env)).spawn().join().await;

        assert_eq!(report.outcome, TaskOutcome::Completed { cycles: 2 });
        assert_eq!(env.metrics().total_cycles(), 2);
        assert_eq!(env.metrics().executed_instructions(), 1);
    }

    #[tokio::test]
    async fn panicking_worker_notifies_finish_without_unwinding_the_joiner() {
        struct PanicEverywhere;

        impl Observer for PanicEverywhere {
            fn on_task_started(&self, _task: &str) {
                panic!("start boom");
            }
            fn on_task_finished(&self, _task: &str, _outcome: &TaskOutcome) {
                panic!("finish boom");
            }
        }

        let env = env(Arc::new(PanicEverywhere), CancellationToken::new(), 0);
        let report = Task::new("BMT-2", 1, Arc::clone(&env)).spawn().join().await;

        assert_eq!(
            report.outcome,
            TaskOutcome::Failed(TaskError::Panicked("start boom".into()))
        );
        assert_eq!(env.metrics().executed_instructions(), 0);
    }
}
