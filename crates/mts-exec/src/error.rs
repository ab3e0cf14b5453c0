use mts_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("pool is shut down; rejected task {0}")]
    PoolShutdown(String),
    #[error("pool worker {slot} terminated abnormally: {reason}")]
    PoolWorker { slot: usize, reason: String },
}

impl From<ExecError> for CoreError {
    fn from(e: ExecError) -> Self {
        CoreError::Dispatch(e.to_string())
    }
}
