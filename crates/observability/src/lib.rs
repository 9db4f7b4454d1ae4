//! Tracing and logging setup shared by binaries and demos.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init(subscriber::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod subscriber;
