use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system with JSON formatting and environment-based filtering.
///
/// - Uses `RUST_LOG` for level filtering, falling back to `default_level` when unset
/// - Configures JSON output format for structured logging
/// - Flattens event fields for cleaner log output
/// - Writes to stderr; stdout belongs to the stream processor's data
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .flatten_event(true)
        .init();
}

/// Default level for `ec run`. The processor sits between a shell and its
/// terminal, so only problems are reported unless asked otherwise.
pub const RUN_LOG_LEVEL: &str = "warn";

/// Default level for `ec serve`.
pub const SERVE_LOG_LEVEL: &str = "info";
