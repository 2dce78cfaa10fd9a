use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Initializes the `tracing` logging framework.
///
/// Output is filtered by the
/// [`RUST_LOG`](tracing_subscriber::filter::EnvFilter) environment variable,
/// defaulting to `INFO`.
pub fn init() {
    let log_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(log_filter))
        .init();
}
