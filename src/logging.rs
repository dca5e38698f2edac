//! Logging setup shared by the driver binaries and the engine stub

/// Install the stderr `tracing` subscriber. `RUST_LOG` wins over `default`.
/// Later calls are no-ops once a subscriber is installed.
pub fn init(default: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
