//! Tracing subscriber setup.
//!
//! `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "recap=info,warn";

/// Installs the global fmt subscriber. Returns `false` when one was already
/// installed; never panics.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
