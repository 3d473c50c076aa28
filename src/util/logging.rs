use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record};

/// Plain stderr logger for hosts that do not install their own.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{:<5} {}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;
static INIT: Once = Once::new();

/// Install the console logger at `level`. Calling it again is a no-op, as
/// is calling it after the host registered a different `log` backend.
pub fn init_logger(level: LevelFilter) {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    });
}
