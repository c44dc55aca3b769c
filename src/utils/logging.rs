//! Logging macros gated by a per-module `ENABLE_LOGS` constant, for loops
//! that would otherwise flood the log on every fix or tick.
//!
//! ```ignore
//! const ENABLE_LOGS: bool = false;
//! use crate::{log_debug, log_info};
//!
//! log_info!("only emitted when ENABLE_LOGS is true");
//! ```

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Install the process-wide logger. `RUST_LOG` overrides the info default.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}
