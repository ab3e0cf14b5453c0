mod report;
pub use report::{RunReport, TaskFailure};

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use mts_model::{Model, RunSpec, TaskCount};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    config::SimConfig,
    dispatch::Batch,
    error::CoreError,
    metrics::Metrics,
    observer::{Observer, Observers, notify_guarded},
    router::DispatchRouter,
    task::{Task, TaskEnv},
};

/// Entry point of the simulator: validates a request, runs one batch, reports the result.
///
/// Every run owns a fresh [`Metrics`]; nothing is carried over between runs.
pub struct Simulator {
    router: DispatchRouter,
    cfg: SimConfig,
    observers: Observers,
}

impl Simulator {
    pub fn new(router: DispatchRouter, cfg: SimConfig) -> Self {
        Self {
            router,
            cfg,
            observers: Observers::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    /// Run from raw user input, e.g. a text field and a model selector.
    pub async fn run_input(&self, task_count: &str, model: &str) -> Result<RunReport, CoreError> {
        let spec = RunSpec::parse(task_count, model)?;
        self.run(spec).await
    }

    pub async fn run(&self, spec: RunSpec) -> Result<RunReport, CoreError> {
        self.run_with_cancel(spec, CancellationToken::new()).await
    }

    /// Run one batch; cancelling `cancel` interrupts every task still waiting.
    ///
    /// Interrupted tasks show up in [`RunReport::failures`] and are absent from the metrics.
    #[instrument(level = "info", skip(self, cancel), fields(model = %spec.model, tasks = spec.task_count.get()))]
    pub async fn run_with_cancel(
        &self,
        spec: RunSpec,
        cancel: CancellationToken,
    ) -> Result<RunReport, CoreError> {
        let dispatcher = self.router.resolve(spec.model)?;
        let run_id = Uuid::new_v4();
        let requested = spec.task_count.get();

        let cancel = cancel.child_token();
        let _stop = cancel.clone().drop_guard();
        if let Some(limit) = self.cfg.run_timeout {
            spawn_deadline(cancel.clone(), limit);
        }

        let metrics = Arc::new(Metrics::new());
        let env = Arc::new(TaskEnv::new(
            Arc::clone(&metrics),
            Arc::new(self.observers.clone()),
            cancel.clone(),
            self.cfg.timing(),
        ));
        let tasks = (0..requested)
            .map(|i| Task::new(spec.model.task_name(i), self.cfg.base_cycles, Arc::clone(&env)))
            .collect();

        debug!(%run_id, dispatcher = dispatcher.name(), "dispatching batch");
        let started = Instant::now();
        let reports = dispatcher
            .dispatch(Batch {
                tasks,
                cancel,
                await_timeout: self.cfg.await_timeout,
            })
            .await?;
        let elapsed = started.elapsed();

        let failures: Vec<TaskFailure> = reports
            .iter()
            .filter_map(|r| {
                r.outcome.error().map(|e| TaskFailure {
                    task: r.task.clone(),
                    reason: e.to_string(),
                })
            })
            .collect();

        let report = RunReport {
            run_id,
            model: spec.model,
            requested,
            metrics: metrics.snapshot(),
            failures,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        };

        if report.is_partial() {
            warn!(
                %run_id,
                failed = report.failures.len(),
                completed = report.completed(),
                "run finished with failed tasks"
            );
        }
        info!(
            %run_id,
            total_cycles = report.metrics.total_cycles,
            executed_instructions = report.metrics.executed_instructions,
            ipc = report.metrics.ipc,
            elapsed_ms = report.elapsed_ms,
            "run completed"
        );

        notify_guarded("on_run_completed", || {
            self.observers.on_run_completed(&report)
        });
        Ok(report)
    }

    /// Run every model back to back with the same task count.
    pub async fn compare(&self, task_count: TaskCount) -> Result<Vec<RunReport>, CoreError> {
        self.compare_with_cancel(task_count, CancellationToken::new())
            .await
    }

    pub async fn compare_with_cancel(
        &self,
        task_count: TaskCount,
        cancel: CancellationToken,
    ) -> Result<Vec<RunReport>, CoreError> {
        let mut reports = Vec::with_capacity(Model::ALL.len());
        for model in Model::ALL {
            let spec = RunSpec::new(task_count, model);
            reports.push(self.run_with_cancel(spec, cancel.clone()).await?);
        }
        Ok(reports)
    }
}

fn spawn_deadline(cancel: CancellationToken, limit: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(limit) => {
                warn!(
                    timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    "run timeout hit; cancelling outstanding tasks"
                );
                cancel.cancel();
            }
        }
    });
}
