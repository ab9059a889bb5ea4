//! Logging setup shared by every binary that embeds the ledger.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::TracingConfig;

/// Initialize process-wide tracing from `RUST_LOG` with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide tracing with an explicit configuration.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_with(config: TracingConfig) -> bool {
    tracing::init_with(config)
}
