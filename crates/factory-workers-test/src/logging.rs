//! Test logging utilities
//!
//! Provides utilities for initializing logging in test environments.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize logging for tests (call once)
///
/// Installs a `tracing` subscriber that writes through the test harness
/// capture and honours `RUST_LOG`. Later calls do nothing, as does the first
/// one if another subscriber is already installed.
///
/// # Examples
///
/// ```
/// use factory_workers_test::logging::init_test_logging;
///
/// init_test_logging();
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::from_default_env())
			.with_test_writer()
			.try_init();
	});
}
