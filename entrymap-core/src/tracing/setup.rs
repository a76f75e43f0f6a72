//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the entrymap tracing/logging system.
///
/// Reads the `ENTRYMAP_LOG` environment variable for per-subsystem log
/// levels, e.g. `ENTRYMAP_LOG=parsers=debug,classify=info`. Falls back to
/// `entrymap=info` when unset or invalid.
///
/// Idempotent; calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ENTRYMAP_LOG")
            .unwrap_or_else(|_| EnvFilter::new("entrymap=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
