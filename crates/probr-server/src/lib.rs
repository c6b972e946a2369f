//! # probr-server
//!
//! Axum HTTP + `WebSocket` transport for Probr text analysis.
//!
//! - HTTP endpoints: `POST /` analysis, health check, Prometheus metrics
//! - `WebSocket` gateway on `GET /`: hello, heartbeat deadline, concurrent
//!   per-connection analyses, close 4009 on missed heartbeats
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod http;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod websocket;

pub use config::ServerConfig;
pub use server::ProbrServer;
pub use shutdown::ShutdownCoordinator;
