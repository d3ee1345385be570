use crate::logging::{LogLevel, Logger};
use std::fmt::Arguments;
use std::sync::Mutex;

/// Keeps every line in memory, in the order it was logged.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> MemoryLogger {
        MemoryLogger::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages that start with `tag`, e.g. `"[ARRIVED]"`.
    pub fn tagged(&self, tag: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(_, line)| line.starts_with(tag))
            .map(|(_, line)| line)
            .collect()
    }

    pub fn at_level(&self, level: LogLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line)
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        let line = args.to_string();
        match self.lines.lock() {
            Ok(mut lines) => lines.push((level, line)),
            Err(poisoned) => poisoned.into_inner().push((level, line)),
        }
    }
}
