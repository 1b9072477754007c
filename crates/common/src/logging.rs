//! Process-wide tracing subscriber.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Install a compact fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once: later calls leave the installed subscriber in
/// place.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).compact())
        .try_init();

    if installed.is_ok() {
        tracing::debug!("Logging initialized");
    }
}
