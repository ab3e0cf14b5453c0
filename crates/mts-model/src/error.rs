use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid task count: {0:?} (expected a positive integer)")]
    InvalidTaskCount(String),
    #[error("unknown model: {0:?} (expected: smt|imt|bmt)")]
    UnknownModel(String),
}
