use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber. `RUST_LOG` wins; otherwise the debug/verbose flags pick the level.
///
/// Returns `false` when a global subscriber was already set.
pub fn init(config: &Config) -> bool {
    let fallback = if config.verbose {
        "txlib=trace"
    } else if config.debug {
        "txlib=debug"
    } else {
        "txlib=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
