//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the Amplify tracing/logging system.
///
/// Reads `AMPLIFY_LOG` for per-module log levels, e.g.
/// `AMPLIFY_LOG=amplify_engine::selection=debug,amplify_engine=info`.
/// Falls back to `amplify=info` if unset or invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("amplify=info"));

        // Another subscriber may already be installed by the host process.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
