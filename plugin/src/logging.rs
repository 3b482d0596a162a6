use tracing_subscriber::EnvFilter;

/// Env var holding the log filter directives.
pub const LOG_ENV: &str = "PD_ADAPTER_LOG";

/// Installs the stderr subscriber. Stdout carries the protocol, so nothing is ever logged there.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
