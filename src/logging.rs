//! Diagnostic logging setup
//!
//! `AUTOVERSION_LOG` takes `tracing` filter directives (for example
//! `nuget_autoversion=debug`). Without it the level is `warn`, or `debug`
//! with `--verbose`. Logs are written to stderr.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "AUTOVERSION_LOG";

/// Filter used when `AUTOVERSION_LOG` is unset or invalid.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(verbose: bool) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
