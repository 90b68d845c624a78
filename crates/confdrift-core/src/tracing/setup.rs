//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "CONFDRIFT_LOG";

/// Filter used when `CONFDRIFT_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "confdrift=info";

static INIT: Once = Once::new();

/// Initialize the confdrift tracing/logging system.
///
/// Reads `CONFDRIFT_LOG` for per-crate log levels.
/// Format: `CONFDRIFT_LOG=confdrift_engine=debug,confdrift_storage=warn`
///
/// Falls back to `confdrift=info` if `CONFDRIFT_LOG` is not set or is invalid.
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Another subscriber may already be installed by the host process.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
