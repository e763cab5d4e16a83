// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Installs the global tracing subscriber.
/// Filters come from `RUST_LOG`; without it everything at INFO and above is shown.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logging setup complete (default filter '{}').", DEFAULT_FILTER);
}
