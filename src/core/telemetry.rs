//! Tracing initialisation for the CLI.
//!
//! Diagnostics go to stderr so they never mix with the report on stdout.
//! `FLOWKIT_LOG` takes an `EnvFilter` directive; without it the level
//! passed by the caller applies.

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FLOWKIT_LOG";

/// Install the global subscriber. Later calls are ignored.
pub fn init_tracing(level: Level) {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
