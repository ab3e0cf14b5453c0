mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;

use tracing::debug;

/// Install the global subscriber described by `cfg`.
///
/// Events go to stderr (or journald); stdout is left to whatever prints run reports.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::Logger::text(cfg),
        LoggerFormat::Json => log::Logger::json(cfg),
        LoggerFormat::Journald => log::Logger::journald(cfg),
    }?;
    debug!(format = %cfg.format, filter = %cfg.level, "logger initialized");
    Ok(())
}
