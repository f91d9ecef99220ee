//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so stdout stays clean for table and JSON output.
//!
//! - no `-v`: warnings and errors
//! - `-v`: pipeline stage progress
//! - `-vv`: stage sizes and per-row warnings
//! - `-vvv`: everything
//!
//! `RUST_LOG` overrides the level when set.

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count to a level.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Call once, before any work.
pub fn init_logging(verbosity: u8) {
    let filter = build_env_filter(level_from_verbosity(verbosity));
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();

    // A second init (as in tests) is not an error worth reporting
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

/// Build an `EnvFilter` from the given level, respecting `RUST_LOG`.
fn build_env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn
        EnvFilter::new(format!(
            "warn,bookdash={level},bookdashlib={level}",
            level = level_str
        ))
    })
}
