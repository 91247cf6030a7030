//! Logging setup for the command line tool.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary. Logs go to **stderr** so that reports on stdout stay parseable.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `schema_breaking_changes=debug`)

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the default logging subscriber.
///
/// Respects `RUST_LOG` and defaults to `warn` when it is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_level("warn");
}

/// Initialize logging with a custom default level, used when `RUST_LOG` is
/// not set.
pub fn init_logging_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}
