//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Default level is WARN; `-v` bumps it to DEBUG. `YU_LOG` overrides
/// both (standard env-filter syntax).
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("YU_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
