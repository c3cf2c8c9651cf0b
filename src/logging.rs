use std::io;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Default filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the stdout subscriber (level from RUST_LOG, default "info")
pub fn configure_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stdout_log = fmt::layer().with_writer(io::stdout).with_target(false);

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(filter))
        .init();
}
