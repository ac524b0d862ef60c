//! Logging infrastructure.
//!
//! Two layers:
//! - [`BatchLogger`]: one log file per batch run, with an optional live
//!   callback, compact-mode progress filtering, and a tail buffer of
//!   engine output for error diagnosis.
//! - `tracing` integration for library-internal diagnostics, initialized
//!   once at startup via [`init_tracing`].

mod batch_logger;
mod types;

pub use batch_logger::{BatchLogger, BatchLoggerBuilder};
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`, falling back to the provided default level.
/// Call once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.filter_str()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}
