use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "posts_api=info,tower_http=info";

/// Install the global fmt subscriber. `RUST_LOG` wins over the default filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
