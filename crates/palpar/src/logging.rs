//! Structured logging setup.
//!
//! Every operation in the library emits `tracing` events instead of writing
//! to stdout; this module wires up a subscriber for binaries and test
//! harnesses that want to see them. `RUST_LOG` overrides the default level.

use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install a global human-readable subscriber.
///
/// Returns `false` when a global subscriber was already installed, which is
/// the common case in test binaries that call this from several tests.
pub fn try_init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_LOG_FILTER))
        .try_init()
        .is_ok()
}

/// Install a global JSON subscriber with an explicit default filter.
///
/// Intended for CI runs where the log stream is collected and parsed.
pub fn try_init_json(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .json()
        .try_init()
        .is_ok()
}
