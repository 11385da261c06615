//! Logging setup for the command-line tool.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SWALLOWCHECK_LOG";

static INIT: Once = Once::new();

/// Initialize tracing to stderr.
///
/// Reads `SWALLOWCHECK_LOG` for the filter, e.g.
/// `SWALLOWCHECK_LOG=swallowcheck::check=debug`. Without it the level is
/// `warn`, or `debug` when `verbose` is set. Stdout stays reserved for
/// reports. Safe to call more than once.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "swallowcheck=debug"
        } else {
            "swallowcheck=warn"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose)
                    .with_line_number(verbose),
            )
            .with(filter)
            .init();
    });
}
