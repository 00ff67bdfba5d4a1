//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `level` ("trace", "debug", "info",
/// "warn", "error") is used. `format` is "human" or "json". Calling this more
/// than once is harmless: later calls leave the first subscriber in place
/// and return `false`.
pub fn init_tracing(level: &str, format: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}
