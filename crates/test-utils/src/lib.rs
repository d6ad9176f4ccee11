//! Shared fixtures and doubles for the `labrun` integration tests.

pub mod builders;
pub mod fakes;

use std::future::Future;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single awaited step in a test. Watch tests sleep
/// through settle windows, so this is generous.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Route `tracing` output through the test harness capture.
///
/// Filtered by `LABRUN_LOG` (falls back to `labrun=debug`); output only shows
/// for failing tests unless `--nocapture` is passed. Calling it from every
/// test is fine: only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LABRUN_LOG")
        .unwrap_or_else(|_| EnvFilter::new("labrun=debug"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test step did not finish within {TEST_TIMEOUT:?}"),
    }
}
