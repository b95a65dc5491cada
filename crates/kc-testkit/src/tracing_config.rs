//! Tracing configuration for test output.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize tracing for tests.
///
/// Safe to call from every test; only the first call installs the subscriber.
/// Uses `RUST_LOG` when set, otherwise `info,kc_client=debug`.
pub fn init_test_tracing() {
    init_with(|| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kc_client=debug"))
    });
}

/// Initialize tracing with an explicit filter such as `"trace"`.
///
/// Has no effect once tracing has been initialized.
pub fn init_test_tracing_with_filter(filter: &str) {
    init_with(|| EnvFilter::new(filter));
}

fn init_with(filter: impl FnOnce() -> EnvFilter) {
    INIT.call_once(|| {
        // The test binary may already have a global subscriber.
        let _ = tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_ansi(false)
                    .compact(),
            )
            .try_init();
    });
}
