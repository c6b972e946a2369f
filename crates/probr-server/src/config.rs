//! Server configuration.

use std::time::Duration;

use probr_settings::{Settings, Transport};

/// Runtime configuration for [`crate::server::ProbrServer`].
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host to bind.
    pub host: String,
    /// Port to bind (`0` for auto-assign).
    pub port: u16,
    /// Exposed transports.
    pub transport: Transport,
    /// Maximum WebSocket silence before the session is closed.
    pub heartbeat_interval: Duration,
    /// Max WebSocket frame / HTTP body size in bytes.
    pub max_frame_bytes: usize,
    /// Max in-flight analyses per WebSocket connection.
    pub max_concurrent_analyses: usize,
    /// Capacity of each connection's outbound frame queue.
    pub outbound_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            transport: Transport::Both,
            heartbeat_interval: Duration::from_secs(45),
            max_frame_bytes: 2 * 1024 * 1024,
            max_concurrent_analyses: 4,
            outbound_queue: 256,
        }
    }
}

impl From<&Settings> for ServerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            transport: settings.transport,
            heartbeat_interval: settings.heartbeat(),
            max_frame_bytes: settings.max_frame_bytes,
            max_concurrent_analyses: settings.max_concurrent_analyses,
            ..Self::default()
        }
    }
}

impl ServerConfig {
    /// Heartbeat interval in whole milliseconds, as announced in the hello frame.
    pub fn heartbeat_interval_ms(&self) -> u64 {
        u64::try_from(self.heartbeat_interval.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_zero() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 0);
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn from_settings() {
        let settings = Settings {
            port: 7000,
            heartbeat_interval: 12_000,
            transport: Transport::Websocket,
            max_concurrent_analyses: 2,
            ..Settings::default()
        };
        let cfg = ServerConfig::from(&settings);
        assert_eq!(cfg.port, 7000);
        assert_eq!(cfg.heartbeat_interval, Duration::from_secs(12));
        assert_eq!(cfg.heartbeat_interval_ms(), 12_000);
        assert_eq!(cfg.transport, Transport::Websocket);
        assert_eq!(cfg.max_concurrent_analyses, 2);
        assert_eq!(cfg.max_frame_bytes, settings.max_frame_bytes);
    }
}
