use std::time::Duration;

use async_trait::async_trait;
use mts_model::Model;
use tokio_util::sync::CancellationToken;

use crate::{error::CoreError, task::Task, task::TaskReport};

/// One run's worth of tasks handed to a dispatcher.
pub struct Batch {
    pub tasks: Vec<Task>,
    /// Run-level cancellation shared by every task of the batch.
    pub cancel: CancellationToken,
    /// Upper bound on waiting for the batch, for dispatchers that support one.
    pub await_timeout: Option<Duration>,
}

impl Batch {
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// A way of fanning a batch of tasks out to workers and waiting for all of them.
///
/// Implementations must return only once every task of the batch reached a terminal state,
/// with one [`TaskReport`] per task. A failing task is reported, never propagated: `Err` is
/// reserved for dispatcher bugs that leave the batch in an unknown state.
#[async_trait]
pub trait Dispatch: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, model: Model) -> bool;

    async fn dispatch(&self, batch: Batch) -> Result<Vec<TaskReport>, CoreError>;
}
