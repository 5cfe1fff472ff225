//! TEAM_221: Kernel Logger implementation.
//!
//! Implements the `log::Log` trait to route log messages to the hal console.
//! Supports compile-time and runtime log level filtering.

use log::{LevelFilter, Metadata, Record, SetLoggerError};
use pos_hal::println;

/// Global logger instance
static LOGGER: KernelLogger = KernelLogger;

struct KernelLogger;

impl log::Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Initialize the logger.
///
/// # Arguments
/// * `max_level` - The maximum log level to display.
///
/// Fails if another logger was installed first; the level is applied either way.
pub fn init(max_level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_max_level(max_level);
    log::set_logger(&LOGGER)
}
