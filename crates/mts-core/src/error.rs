use mts_model::ModelError;
use thiserror::Error;

use crate::worker::Phase;

/// Run-level failures. A run that returns one of these recorded nothing.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("no dispatcher registered for model: {0}")]
    NoDispatcher(String),
    #[error("worker {worker}: invalid phase transition {from:?} -> {to:?}")]
    Phase { worker: String, from: Phase, to: Phase },
    #[error("dispatch failed: {0}")]
    Dispatch(String),
}

/// Failure of a single task. Never aborts the rest of the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("interrupted")]
    Interrupted,
    #[error("worker dropped before it was started")]
    NeverStarted,
    #[error("worker panicked: {0}")]
    Panicked(String),
}
