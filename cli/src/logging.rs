//! Diagnostic logging setup.
//!
//! User-facing narration goes through `ProgressReporter`; this subscriber
//! carries structured `tracing` events to stderr for troubleshooting.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, fmt as subscriber_fmt, prelude::*};

/// Environment variable holding the log filter, e.g. `authflow_cli=debug`.
pub const LOG_ENV: &str = "AUTHFLOW_LOG";

/// Build the filter from `AUTHFLOW_LOG`, defaulting to `warn`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let _ = Registry::default()
        .with(env_filter())
        .with(
            subscriber_fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
