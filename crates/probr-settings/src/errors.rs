//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the server configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The configuration file could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    ReadConfig {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not JSON, or a key has the wrong type.
    #[error("config file is not valid: {0}")]
    Parse(#[from] serde_json::Error),
    /// A key holds a value outside its allowed range.
    #[error("invalid `{key}`: {reason}")]
    InvalidValue {
        /// Dotted key path, e.g. `language_tool.url`.
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
    /// A transport name other than `http`, `websocket` or `both`.
    #[error("unknown transport '{0}' (expected http, websocket or both)")]
    UnknownTransport(String),
}

impl SettingsError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            reason: reason.into(),
        }
    }

    /// The offending key, for errors tied to a single setting.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::InvalidValue { key, .. } => Some(key),
            Self::UnknownTransport(_) => Some("transport"),
            Self::ReadConfig { .. } | Self::Parse(_) => None,
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_file() {
        let err = SettingsError::ReadConfig {
            path: PathBuf::from("/etc/probr/config.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "cannot read config file /etc/probr/config.json: no such file"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.key(), None);
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = SettingsError::invalid("heartbeat_interval", "must be at least 10000 ms");
        assert_eq!(err.key(), Some("heartbeat_interval"));
        assert_eq!(
            err.to_string(),
            "invalid `heartbeat_interval`: must be at least 10000 ms"
        );
    }

    #[test]
    fn unknown_transport_maps_to_transport_key() {
        let err = SettingsError::UnknownTransport("carrier-pigeon".into());
        assert_eq!(err.key(), Some("transport"));
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    fn parse_error_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SettingsError = json_err.into();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("config file is not valid"));
    }
}
