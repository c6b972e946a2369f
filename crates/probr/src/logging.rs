//! `tracing` subscriber setup.

use probr_settings::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set and valid, otherwise the configured level.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the global tracing subscriber, writing to stderr.
///
/// Call once at startup. Subsequent calls are no-ops.
pub fn init_subscriber(settings: &LoggingSettings) {
    let filter = build_filter(&settings.level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // try_init is a no-op if a global subscriber is already set
    let _ = match settings.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_from_level() {
        // RUST_LOG is not set under `cargo test` unless the caller sets it.
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(build_filter("debug").to_string(), "debug");
        }
    }

    #[test]
    fn init_twice_is_harmless() {
        let settings = LoggingSettings::default();
        init_subscriber(&settings);
        init_subscriber(&LoggingSettings {
            format: LogFormat::Json,
            ..settings
        });
    }
}
