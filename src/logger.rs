use tracing_subscriber::EnvFilter;

/// Installs the process-wide tracing subscriber, filtered by `RUST_LOG`.
/// For binaries embedding the engine; tests and libraries leave logging to
/// their host.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
