//! Settings types and their compiled defaults.
//!
//! Keys are `snake_case` to stay compatible with existing `config.json`
//! files (`{"port": 6969, "heartbeat_interval": 45000}`).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Smallest heartbeat interval (milliseconds) accepted for the WebSocket transport.
pub const MIN_HEARTBEAT_INTERVAL_MS: u64 = 10_000;

/// Which transports the server exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Only `POST /`.
    Http,
    /// Only the WebSocket gateway.
    Websocket,
    /// Both, sharing one listener.
    #[default]
    Both,
}

impl Transport {
    /// Whether `POST /` is served.
    pub fn http_enabled(self) -> bool {
        matches!(self, Self::Http | Self::Both)
    }

    /// Whether the WebSocket gateway is served.
    pub fn websocket_enabled(self) -> bool {
        matches!(self, Self::Websocket | Self::Both)
    }

    /// Lowercase name, as used in config files and the health endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Websocket => "websocket",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "websocket" | "ws" => Ok(Self::Websocket),
            "both" => Ok(Self::Both),
            other => Err(SettingsError::UnknownTransport(other.to_string())),
        }
    }
}

/// Top-level server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bind address.
    pub host: String,
    /// Listen port (`0` auto-assigns).
    pub port: u16,
    /// Maximum WebSocket silence, in milliseconds, before the session is closed.
    pub heartbeat_interval: u64,
    /// Exposed transports.
    pub transport: Transport,
    /// Maximum size of an analysed message in bytes.
    pub max_message_bytes: usize,
    /// Maximum size of a WebSocket frame or HTTP request body in bytes.
    pub max_frame_bytes: usize,
    /// Maximum analyses running at once on a single WebSocket connection.
    pub max_concurrent_analyses: usize,
    /// Grammar checker settings.
    pub language_tool: LanguageToolSettings,
    /// Log output settings.
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6969,
            heartbeat_interval: 45_000,
            transport: Transport::Both,
            max_message_bytes: 1_048_576,
            max_frame_bytes: 2_097_152,
            max_concurrent_analyses: 4,
            language_tool: LanguageToolSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Heartbeat interval as a [`Duration`].
    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval)
    }

    /// Check cross-field invariants. Called once before the listener binds.
    pub fn validate(&self) -> Result<()> {
        if self.transport.websocket_enabled() && self.heartbeat_interval < MIN_HEARTBEAT_INTERVAL_MS
        {
            return Err(SettingsError::invalid(
                "heartbeat_interval",
                format!(
                    "must be at least {MIN_HEARTBEAT_INTERVAL_MS} ms when the WebSocket \
                     transport is enabled (got {})",
                    self.heartbeat_interval
                ),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(SettingsError::invalid("host", "must not be empty"));
        }
        if self.max_message_bytes == 0 {
            return Err(SettingsError::invalid("max_message_bytes", "must be greater than zero"));
        }
        if self.max_frame_bytes < self.max_message_bytes {
            return Err(SettingsError::invalid(
                "max_frame_bytes",
                format!(
                    "{} is smaller than max_message_bytes ({})",
                    self.max_frame_bytes, self.max_message_bytes
                ),
            ));
        }
        if self.max_concurrent_analyses == 0 {
            return Err(SettingsError::invalid("max_concurrent_analyses", "must be at least 1"));
        }
        self.language_tool.validate()
    }
}

/// LanguageTool server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageToolSettings {
    /// Whether `process_language` requests are served at all.
    pub enabled: bool,
    /// Base URL of the LanguageTool HTTP server (without `/v2`).
    pub url: String,
    /// Language code passed to the checker.
    pub language: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Rule ids to disable on every check.
    pub disabled_rules: Vec<String>,
}

impl Default for LanguageToolSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://127.0.0.1:8081".to_string(),
            language: "en-US".to_string(),
            timeout_ms: 30_000,
            disabled_rules: Vec::new(),
        }
    }
}

impl LanguageToolSettings {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let parsed = url::Url::parse(&self.url).map_err(|e| {
            SettingsError::invalid("language_tool.url", format!("'{}': {e}", self.url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::invalid(
                "language_tool.url",
                format!("must use http or https (got '{}')", parsed.scheme()),
            ));
        }
        if self.language.trim().is_empty() {
            return Err(SettingsError::invalid("language_tool.language", "must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "language_tool.timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive (`RUST_LOG` takes precedence).
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
