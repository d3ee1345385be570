use crate::logging::{LogLevel, Logger};
use std::fmt::Arguments;

/// Forwards every line to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLogger;

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl Logger for FacadeLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        let level: log::Level = level.into();
        log::log!(level, "{}", args);
    }
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}
