//! Log subscriber for the binary.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "TETHER_LOG";

/// Install the global subscriber. Later calls are no-ops.
///
/// `TETHER_LOG` wins when set; otherwise warnings are shown, or everything
/// down to `debug` with `verbose`.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let fallback = if verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}
