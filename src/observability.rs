//! Tracing setup for the console host.
//!
//! `RUST_LOG` wins over the configured level when it is set.

use crate::config::LoggingSettings;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the log filter: `RUST_LOG` if present and valid, else `level`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// chat replies.
pub fn init_tracing(settings: &LoggingSettings) {
    let registry = tracing_subscriber::registry().with(env_filter(&settings.level));
    if settings.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
