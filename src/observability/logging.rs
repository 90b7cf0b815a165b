//! # Logging
//!
//! Tracing subscriber setup. `RUST_LOG` controls filtering.

use crate::constants::DEFAULT_LOG_FILTER;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// A second call (tests, embedding) leaves the first subscriber in place.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        warn!("Tracing subscriber already initialized: {}", e);
    }
}
