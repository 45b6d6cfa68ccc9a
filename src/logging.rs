//! Tracing setup for the server binary.
//!
//! stdout carries JSON-RPC, so everything goes to stderr.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "SYMDEF_LOG";

/// Build the filter: an explicit `level` wins, then `SYMDEF_LOG`, then
/// `RUST_LOG`, then `info`.
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    if let Some(level) = level {
        match EnvFilter::try_new(level) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("invalid log filter {level:?}: {e}"),
        }
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(level: Option<&str>) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    // A second initialisation (tests, embedding) is not an error.
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(stderr_layer)
        .try_init();
}
