//! Tracing and logging (shared setup).

/// Initialize process-wide logging with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops and
/// return `false`.
pub fn init() -> bool {
    self::tracing::init(DEFAULT_FILTER)
}

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Tracing configuration (filters, layers).
pub mod tracing;
