//! Dedicated worker for one task, driven through `Created -> Started -> Joined`.
//!
//! Creating a worker already places it on the runtime, parked behind a start gate, so a
//! dispatcher can build a whole block of workers and release them later. The order in which a
//! dispatcher calls [`Worker::create`], [`Worker::start`] and [`Worker::join`] is the only thing
//! that tells the interleaved and block models apart.

use tokio::sync::oneshot;
use tracing::trace;

use crate::{
    error::CoreError,
    task::{Task, TaskHandle, TaskReport},
};

/// Lifecycle phase of a worker (or of a pool of them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Started,
    Joined,
}

impl Phase {
    /// The only phase that may follow `self`.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Created => Some(Phase::Started),
            Phase::Started => Some(Phase::Joined),
            Phase::Joined => None,
        }
    }

    /// Check that `self -> to` is a legal transition.
    pub fn advance(self, owner: &str, to: Phase) -> Result<Phase, CoreError> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(CoreError::Phase {
                worker: owner.to_string(),
                from: self,
                to,
            })
        }
    }
}

pub struct Worker {
    name: String,
    phase: Phase,
    gate: Option<oneshot::Sender<()>>,
    handle: Option<TaskHandle>,
}

impl Worker {
    /// Place `task` on the runtime without letting it run yet.
    pub fn create(task: Task) -> Self {
        let (gate, rx) = oneshot::channel();
        let handle = task.spawn_gated(rx);
        trace!(worker = handle.name(), "worker created");
        Self {
            name: handle.name().to_string(),
            phase: Phase::Created,
            gate: Some(gate),
            handle: Some(handle),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Release the task.
    pub fn start(&mut self) -> Result<(), CoreError> {
        self.phase = self.phase.advance(self.name(), Phase::Started)?;
        if let Some(gate) = self.gate.take() {
            let _ = gate.send(());
        }
        trace!(worker = self.name(), "worker started");
        Ok(())
    }

    /// Wait for the task to finish.
    ///
    /// Joining a worker that was never started is rejected rather than waited on forever.
    pub async fn join(&mut self) -> Result<TaskReport, CoreError> {
        let next = self.phase.advance(self.name(), Phase::Joined)?;
        let handle = self.handle.take().ok_or_else(|| CoreError::Phase {
            worker: self.name.clone(),
            from: self.phase,
            to: Phase::Joined,
        })?;

        let report = handle.join().await;
        self.phase = next;
        trace!(worker = %report.task, "worker joined");
        Ok(report)
    }
}
