//! Rolling Logger
//!
//! `log` backend for the browser. Every record is written to the devtools
//! console and kept in a fixed-size ring buffer that can be read back later.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Default number of lines kept in memory
pub const DEFAULT_CAPACITY: usize = 500;

/// Console logger with a circular buffer of formatted lines
pub struct RollingLogger {
    level: LevelFilter,
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl RollingLogger {
    pub fn new(level: LevelFilter, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            level,
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Snapshot of the buffered lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }
}

/// `2026-10-16T08:15:02.120Z INFO  biz_admin_ui::list: message`
pub fn format_record(record: &Record) -> String {
    format!(
        "{} {:<5} {}: {}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        emit(record.level(), &line);
        self.push(line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(level: Level, line: &str) {
    if level <= Level::Warn {
        eprintln!("{}", line);
    }
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the global logger. Safe to call once per page load.
pub fn init(level: LevelFilter, capacity: usize) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(level, capacity));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Lines buffered by the global logger (empty before `init`)
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(RollingLogger::recent_lines).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_line(logger: &RollingLogger, level: Level, msg: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("test")
                .args(format_args!("{}", msg))
                .build(),
        );
    }

    #[test]
    fn test_buffer_rolls_over() {
        let logger = RollingLogger::new(LevelFilter::Debug, 3);
        for i in 0..5 {
            log_line(&logger, Level::Info, &format!("line {}", i));
        }

        let lines = logger.recent_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("line 2"));
        assert!(lines[2].ends_with("line 4"));
    }

    #[test]
    fn test_level_filter() {
        let logger = RollingLogger::new(LevelFilter::Warn, 10);
        log_line(&logger, Level::Info, "dropped");
        log_line(&logger, Level::Error, "kept");

        let lines = logger.recent_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("test: kept"));
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let logger = RollingLogger::new(LevelFilter::Trace, 0);
        log_line(&logger, Level::Debug, "a");
        log_line(&logger, Level::Debug, "b");
        assert_eq!(logger.recent_lines().len(), 1);
    }
}
