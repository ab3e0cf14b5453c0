use async_trait::async_trait;
use mts_core::{Batch, CoreError, Dispatch, TaskReport, Worker};
use mts_model::Model;
use tracing::{debug, instrument};

/// Block multithreading: the whole block is created, then started, then joined.
///
/// No task can begin before every worker of the block exists. With workers as cheap as
/// these the metrics match [`crate::ImtDispatch`]; only the dispatch timing differs.
pub struct BmtDispatch {
    name: &'static str,
}

impl BmtDispatch {
    pub fn new() -> Self {
        Self { name: "bmt" }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Default for BmtDispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatch for BmtDispatch {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, model: Model) -> bool {
        matches!(model, Model::Bmt)
    }

    #[instrument(level = "debug", skip_all, fields(dispatcher = self.name, tasks = batch.len()))]
    async fn dispatch(&self, batch: Batch) -> Result<Vec<TaskReport>, CoreError> {
        let mut workers: Vec<Worker> = batch.tasks.into_iter().map(Worker::create).collect();
        debug!(workers = workers.len(), "block created");

        for worker in &mut workers {
            worker.start()?;
        }
        debug!("block started");

        let mut reports = Vec::with_capacity(workers.len());
        for worker in &mut workers {
            reports.push(worker.join().await?);
        }
        Ok(reports)
    }
}
