use async_trait::async_trait;
use mts_core::{Batch, CoreError, Dispatch, TaskReport, Worker};
use mts_model::Model;
use tracing::{debug, instrument};

/// Interleaved multithreading: one dedicated worker per task.
///
/// Each worker is started the moment it is created, in submission order, and the batch is then
/// joined in that same order.
pub struct ImtDispatch {
    name: &'static str,
}

impl ImtDispatch {
    pub fn new() -> Self {
        Self { name: "imt" }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Default for ImtDispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatch for ImtDispatch {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, model: Model) -> bool {
        matches!(model, Model::Imt)
    }

    #[instrument(level = "debug", skip_all, fields(dispatcher = self.name, tasks = batch.len()))]
    async fn dispatch(&self, batch: Batch) -> Result<Vec<TaskReport>, CoreError> {
        let mut workers = Vec::with_capacity(batch.len());
        for task in batch.tasks {
            let mut worker = Worker::create(task);
            worker.start()?;
            workers.push(worker);
        }
        debug!(workers = workers.len(), "all workers started");

        let mut reports = Vec::with_capacity(workers.len());
        for worker in &mut workers {
            reports.push(worker.join().await?);
        }
        Ok(reports)
    }
}
