//! Logging bootstrap.
//!
//! Log configuration belongs to the application's `configure_logging`
//! hook; this module provides the default most hosts want there.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize a `tracing` subscriber with an env-driven filter
/// (`RUST_LOG`) falling back to `default_filter`, and a compact fmt
/// layer. Safe to call more than once; later calls are no-ops.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
