//! Logging setup for the command-line tool.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! embedding program's choice.
//!
//! Environment variables:
//! - `RUST_LOG`: filter directives (e.g. "debug", "bqfdw=trace"); overrides
//!   the default level
//! - `LOG_FORMAT`: "full" (default) or "compact"

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Timestamp, level and fields on one line
    #[default]
    Full,
    /// Abbreviated fields
    Compact,
}

impl LogFormat {
    /// Parse from environment variable
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Full,
        }
    }
}

/// Default filter: `info` when verbose, `warn` otherwise.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

/// Install a stderr subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let registry = tracing_subscriber::registry().with(env_filter);
    let _ = match LogFormat::from_env() {
        LogFormat::Full => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
}
