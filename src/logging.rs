use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Output goes to stderr so stdout stays free
/// for fetched bodies. `RUST_LOG` overrides `default_directive`.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
