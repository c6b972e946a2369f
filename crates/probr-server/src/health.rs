//! `/health` endpoint.

use std::time::Instant;

use probr_settings::Transport;
use serde::Serialize;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Open WebSocket connections.
    pub connections: usize,
    /// Exposed transports (`http`, `websocket`).
    pub transports: Vec<&'static str>,
    /// Whether grammar checking is configured.
    pub grammar_checker: bool,
}

/// Build a health response from live counters.
pub fn health_check(
    start_time: Instant,
    connections: usize,
    transport: Transport,
    grammar_checker: bool,
) -> HealthResponse {
    let mut transports = Vec::with_capacity(2);
    if transport.http_enabled() {
        transports.push("http");
    }
    if transport.websocket_enabled() {
        transports.push("websocket");
    }
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        connections,
        transports,
        grammar_checker,
    }
}
