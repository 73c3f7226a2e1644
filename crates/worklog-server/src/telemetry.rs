//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise production logs JSON at
/// `info`, and every other environment logs text with debug output
/// from the workspace crates.
pub fn init(production: bool) {
    let default_directive = if production {
        "info"
    } else {
        "info,worklog=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if production {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
