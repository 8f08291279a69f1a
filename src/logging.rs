use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Call once, before anything logs;
/// `RUST_LOG` overrides the `info` default.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
