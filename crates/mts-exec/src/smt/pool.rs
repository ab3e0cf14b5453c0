//! Fixed-size worker pool fed from a single FIFO queue.
//!
//! The pool goes through the same phases as a single worker: `Created` while workers are up and
//! the queue accepts tasks, `Started` once the queue is closed and the batch is fully issued,
//! `Joined` after every worker drained the queue and exited.

use std::{collections::HashSet, sync::Arc, time::Duration};

use mts_core::{CoreError, Phase, Task, TaskError, TaskOutcome, TaskReport};
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::error::ExecError;

const OWNER: &str = "smt-pool";

pub struct Pool {
    phase: Phase,
    queue: Option<mpsc::UnboundedSender<Task>>,
    reports: mpsc::UnboundedReceiver<TaskReport>,
    submitted: Vec<String>,
    workers: Vec<JoinHandle<()>>,
}

impl Pool {
    /// Spawn `size` idle workers on the current runtime.
    pub fn with_size(size: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Task>();
        let (report_tx, reports) = mpsc::unbounded_channel::<TaskReport>();
        let rx = Arc::new(Mutex::new(rx));
        let workers = (0..size)
            .map(|slot| tokio::spawn(work(slot, Arc::clone(&rx), report_tx.clone())))
            .collect();

        Self {
            phase: Phase::Created,
            queue: Some(tx),
            reports,
            submitted: Vec::with_capacity(size),
            workers,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Enqueue a task; rejected once the pool is shut down.
    pub fn submit(&mut self, task: Task) -> Result<(), ExecError> {
        let Some(queue) = &self.queue else {
            return Err(ExecError::PoolShutdown(task.name().to_string()));
        };
        let name = task.name().to_string();
        queue
            .send(task)
            .map_err(|e| ExecError::PoolShutdown(e.0.name().to_string()))?;
        self.submitted.push(name);
        Ok(())
    }

    /// Close the queue. Workers drain what is already queued, then exit.
    pub fn shutdown(&mut self) -> Result<(), CoreError> {
        self.phase = self.phase.advance(OWNER, Phase::Started)?;
        self.queue.take();
        Ok(())
    }

    /// Wait for every worker to exit.
    ///
    /// With a `timeout`, `cancel` is fired once it elapses and the wait continues: interrupted
    /// tasks return promptly, so every task still ends up with a report. A worker that dies
    /// takes no sibling down; each task it left without a report is reported as
    /// [`TaskError::Panicked`].
    pub async fn await_termination(
        &mut self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<Vec<TaskReport>, CoreError> {
        let next = self.phase.advance(OWNER, Phase::Joined)?;
        let mut joined = Box::pin(join_all(std::mem::take(&mut self.workers)));

        let lost = match timeout {
            None => joined.await,
            Some(limit) => match tokio::time::timeout(limit, &mut joined).await {
                Ok(lost) => lost,
                Err(_) => {
                    warn!(
                        timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                        "pool await timed out; cancelling outstanding tasks"
                    );
                    cancel.cancel();
                    joined.await
                }
            },
        };

        let reports = self.collect(&lost).await;
        self.phase = next;
        Ok(reports)
    }

    async fn collect(&mut self, lost: &[ExecError]) -> Vec<TaskReport> {
        let mut reports = Vec::with_capacity(self.submitted.len());
        while let Some(report) = self.reports.recv().await {
            reports.push(report);
        }
        if lost.is_empty() {
            return reports;
        }

        let reason = lost
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        let seen: HashSet<&str> = reports.iter().map(|r| r.task.as_str()).collect();
        let orphaned: Vec<TaskReport> = self
            .submitted
            .iter()
            .filter(|name| !seen.contains(name.as_str()))
            .map(|name| TaskReport {
                task: name.clone(),
                outcome: TaskOutcome::Failed(TaskError::Panicked(reason.clone())),
            })
            .collect();

        warn!(orphaned = orphaned.len(), %reason, "pool lost workers");
        reports.extend(orphaned);
        reports
    }
}

async fn work(
    slot: usize,
    queue: Arc<Mutex<mpsc::UnboundedReceiver<Task>>>,
    reports: mpsc::UnboundedSender<TaskReport>,
) {
    let mut ran = 0_usize;
    loop {
        let next = queue.lock().await.recv().await;
        let Some(task) = next else { break };
        trace!(slot, task = task.name(), "pool worker picked task");
        let _ = reports.send(task.spawn().join().await);
        ran += 1;
    }
    trace!(slot, ran, "pool worker exiting");
}

/// Join every worker, returning the ones that terminated abnormally.
async fn join_all(workers: Vec<JoinHandle<()>>) -> Vec<ExecError> {
    let mut lost = Vec::new();
    for (slot, worker) in workers.into_iter().enumerate() {
        if let Err(e) = worker.await {
            lost.push(ExecError::PoolWorker {
                slot,
                reason: e.to_string(),
            });
        }
    }
    lost
}
