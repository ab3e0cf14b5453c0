use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::Layered,
    layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError};

type Filtered = Layered<EnvFilter, Registry>;

pub struct Logger;

impl Logger {
    pub fn text(cfg: &LoggerConfig) -> Result<(), LoggerError> {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(cfg.use_color)
            .with_target(cfg.with_targets)
            .with_timer(mk_timer());
        install(&cfg.level, layer)
    }

    pub fn json(cfg: &LoggerConfig) -> Result<(), LoggerError> {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_current_span(true)
            .with_target(cfg.with_targets)
            .with_timer(mk_timer());
        install(&cfg.level, layer)
    }

    pub fn journald(cfg: &LoggerConfig) -> Result<(), LoggerError> {
        mk_journald(&cfg.level)
    }
}

fn install<L>(level: &str, layer: L) -> Result<(), LoggerError>
where
    L: Layer<Filtered> + Send + Sync + 'static,
{
    let filter = mk_filter(level)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(as_error)
}

fn mk_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidFilter(level.to_string()))
}

fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn as_error(e: impl std::fmt::Display) -> LoggerError {
    let s = e.to_string();
    if s.contains("already") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(s)
    }
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn mk_journald(level: &str) -> Result<(), LoggerError> {
    let journald = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?;
    install(level, journald)
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn mk_journald(_level: &str) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{format::LoggerFormat, logger_init};

    #[test]
    fn invalid_level_is_rejected() {
        let err = mk_filter("mts=loud").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidFilter(l) if l == "mts=loud"));
    }

    #[test]
    fn second_init_reports_already_initialized() {
        let cfg = LoggerConfig {
            format: LoggerFormat::Text,
            level: "warn".to_string(),
            ..Default::default()
        };
        let _ = logger_init(&cfg);

        let err = logger_init(&cfg).unwrap_err();
        assert!(matches!(err, LoggerError::AlreadyInitialized));
    }
}
