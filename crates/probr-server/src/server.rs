//! `ProbrServer`: Axum HTTP + WebSocket server on a single listener.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{MethodRouter, get};
use metrics_exporter_prometheus::PrometheusHandle;
use probr_analysis::Analyzer;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::http;
use crate::shutdown::ShutdownCoordinator;
use crate::websocket::{self, session::SessionContext};

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The analysis pipeline.
    pub analyzer: Arc<Analyzer>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// State handed to each WebSocket session.
    pub session: Arc<SessionContext>,
    /// When the server started.
    pub start_time: Instant,
    /// Open WebSocket connections.
    pub connections: Arc<AtomicUsize>,
    /// Prometheus handle for `/metrics`, if a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

/// The main Probr server.
pub struct ProbrServer {
    config: Arc<ServerConfig>,
    analyzer: Arc<Analyzer>,
    shutdown: Arc<ShutdownCoordinator>,
    connections: Arc<AtomicUsize>,
    start_time: Instant,
    metrics: Option<PrometheusHandle>,
}

impl ProbrServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, analyzer: Arc<Analyzer>) -> Self {
        Self {
            config: Arc::new(config),
            analyzer,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            connections: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
            metrics: None,
        }
    }

    /// Serve `/metrics` from this recorder handle.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Build the Axum router with all routes.
    ///
    /// `/` carries `POST` (HTTP transport) and/or the `GET` upgrade
    /// (WebSocket transport), depending on the configured transport.
    pub fn router(&self) -> Router {
        let session = Arc::new(SessionContext {
            analyzer: self.analyzer.clone(),
            heartbeat_interval: self.config.heartbeat_interval,
            max_concurrent_analyses: self.config.max_concurrent_analyses,
            outbound_queue: self.config.outbound_queue,
            shutdown: self.shutdown.token(),
            connections: self.connections.clone(),
        });
        let state = AppState {
            analyzer: self.analyzer.clone(),
            config: self.config.clone(),
            session,
            start_time: self.start_time,
            connections: self.connections.clone(),
            metrics: self.metrics.clone(),
        };

        let mut root: MethodRouter<AppState> = MethodRouter::new();
        if self.config.transport.http_enabled() {
            root = root.post(http::analyze_handler);
        }
        if self.config.transport.websocket_enabled() {
            root = root.get(websocket::ws_handler);
        }

        Router::new()
            .route("/", root)
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .layer(DefaultBodyLimit::max(self.config.max_frame_bytes))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind the listener and start serving in the background.
    ///
    /// Returns the bound address and the serve task, which finishes once
    /// shutdown is signalled and in-flight HTTP requests have drained.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let local_addr = listener.local_addr()?;
        let router = self.router();
        let token = self.shutdown.token();

        info!(
            addr = %local_addr,
            transport = %self.config.transport,
            heartbeat_ms = self.config.heartbeat_interval_ms(),
            "probr server listening"
        );

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(token.cancelled_owned())
                .await
            {
                error!(error = %e, "server error");
            }
        });
        Ok((local_addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open WebSocket connections.
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.connections.load(Ordering::Relaxed),
        state.config.transport,
        state.analyzer.grammar_enabled(),
    ))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
