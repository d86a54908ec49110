#![cfg(feature = "std")]

use std::env;
use log::{self, LevelFilter, Metadata, Record};

use crate::config::LOG_ENV;

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: SimpleLogger = SimpleLogger;

/// Parse a level name, falling back to `default` when it is missing or
/// invalid.
fn level_from(value: Option<String>, default: LevelFilter) -> LevelFilter {
    value.and_then(|lvl| lvl.parse().ok()).unwrap_or(default)
}

/// Initialize logging with a level taken from the `BINGO_LOG` environment
/// variable. Defaults to `default` if the variable is not set or invalid.
pub fn init_logging(default: LevelFilter) {
    let level = level_from(env::var(LOG_ENV).ok(), default);
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}
