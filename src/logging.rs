//! Tracing subscriber setup.
//!
//! Logs go to stderr. `RUST_LOG` wins when set; otherwise the level follows
//! the number of `-v` flags.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity count
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
