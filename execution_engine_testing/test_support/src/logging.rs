//! Logging for tests, via the tracing crate.

use tracing_subscriber::EnvFilter;

/// Installs a global subscriber writing to the test harness output, filtered by `RUST_LOG`.
///
/// Only the first call in a process installs the subscriber; later calls do nothing.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
