use tracing_subscriber::EnvFilter;

/// Application-specific filter variable, checked before `RUST_LOG`.
const LOG_ENV: &str = "MOVIENIGHT_LOG";

/// Installs the stderr subscriber. Defaults to `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
