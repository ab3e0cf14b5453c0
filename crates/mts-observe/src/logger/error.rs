use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format `{0}`; use text, json or journald")]
    InvalidFormat(String),
    #[error("journald output needs Linux and the `journald` feature")]
    JournaldNotSupported,
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
    #[error("cannot install the tracing subscriber: {0}")]
    InitializationFailed(String),
    #[error("invalid log filter `{0}`")]
    InvalidFilter(String),
}
