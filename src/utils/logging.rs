//! Logging setup
//!
//! The plugin only emits `tracing` events. Host applications that don't
//! install their own subscriber can call [`init_tracing`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "voice_recorder=debug,tauri=info";

/// Install a fmt subscriber filtered by `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
