//! `log` backend. Browser console on wasm32, `env_logger` on stderr elsewhere.

use log::{LevelFilter, Record};

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};

    pub struct ConsoleLogger;

    pub static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = super::format_record(record);
            match record.level() {
                Level::Error => web_sys::console::error_1(&line.into()),
                Level::Warn => web_sys::console::warn_1(&line.into()),
                _ => web_sys::console::log_1(&line.into()),
            }
        }

        fn flush(&self) {}
    }
}

/// Install the logger. Later calls are ignored.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LevelFilter) {
    if log::set_logger(&console::LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Install the logger. `RUST_LOG` overrides `level`. Later calls are ignored.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LevelFilter) {
    use std::io::Write;

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", format_record(record)))
        .try_init();
}

fn format_record(record: &Record) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}
