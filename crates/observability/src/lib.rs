//! Logging setup for hosts embedding the document engine.
//!
//! The engine crates only emit `tracing` events; installing a subscriber is
//! the host's call.

/// Initialize process-wide tracing with the `RUST_LOG` filter (default `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide tracing with an explicit filter directive.
pub fn init_with_filter(directives: &str) -> bool {
    tracing::init_with_filter(directives)
}

/// Tracing configuration (filters, layers).
pub mod tracing;
