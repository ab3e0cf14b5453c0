mod pool;
pub use pool::Pool;

use async_trait::async_trait;
use mts_core::{Batch, CoreError, Dispatch, TaskReport};
use mts_model::Model;
use tracing::{debug, instrument};

/// Simultaneous multithreading: the whole batch is issued onto a pool with one worker per task.
///
/// The queue is closed right after the last task is enqueued. The pool is then awaited for
/// [`Batch::await_timeout`], unbounded when unset; past it, the outstanding tasks are cancelled.
pub struct SmtDispatch {
    name: &'static str,
}

impl SmtDispatch {
    pub fn new() -> Self {
        Self { name: "smt" }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Default for SmtDispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatch for SmtDispatch {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, model: Model) -> bool {
        matches!(model, Model::Smt)
    }

    #[instrument(level = "debug", skip_all, fields(dispatcher = self.name, tasks = batch.len()))]
    async fn dispatch(&self, batch: Batch) -> Result<Vec<TaskReport>, CoreError> {
        let Batch {
            tasks,
            cancel,
            await_timeout,
        } = batch;

        let mut pool = Pool::with_size(tasks.len());
        for task in tasks {
            pool.submit(task)?;
        }
        pool.shutdown()?;
        debug!(pool = pool.size(), "batch issued; pool shut down");

        pool.await_termination(await_timeout, &cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supports_only_smt() {
        let d = SmtDispatch::new();
        assert!(d.supports(Model::Smt));
        assert!(!d.supports(Model::Imt));
        assert!(!d.supports(Model::Bmt));
        assert_eq!(d.name(), "smt");
    }
}
