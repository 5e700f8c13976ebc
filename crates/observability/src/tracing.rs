//! Tracing/logging initialization.
//!
//! JSON lines on stdout, one event per page break at `debug`, one summary per
//! laid-out document at `info`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Initialize with explicit directives such as `"folio_layout=debug"`.
///
/// Returns `false` if the directives do not parse or a subscriber is already
/// installed.
pub fn init_with_filter(directives: &str) -> bool {
    match EnvFilter::try_new(directives) {
        Ok(filter) => install(filter),
        Err(_) => false,
    }
}

fn install(filter: EnvFilter) -> bool {
    // JSON logs + timestamps.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init()
        .is_ok()
}
