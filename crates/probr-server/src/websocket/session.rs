//! WebSocket session lifecycle: handles a single connected client from
//! upgrade through disconnect.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket};
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge, histogram};
use probr_analysis::Analyzer;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::connection::{ClientConnection, Outbound};
use super::handler::{FrameAction, handle_message, run_analysis};
use super::heartbeat::{HeartbeatResult, run_heartbeat};
use super::protocol;
use crate::metrics::{
    WS_CONNECTION_DURATION_SECONDS, WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL,
    WS_DISCONNECTIONS_TOTAL, WS_HEARTBEAT_TIMEOUTS_TOTAL,
};

/// Budget for queueing a server close frame and flushing the writer.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared state every session needs.
pub struct SessionContext {
    /// The analysis pipeline.
    pub analyzer: Arc<Analyzer>,
    /// Maximum silence before the session is closed with 4009.
    pub heartbeat_interval: Duration,
    /// Analyses allowed to run at once per connection; the rest wait.
    pub max_concurrent_analyses: usize,
    /// Outbound queue capacity per connection.
    pub outbound_queue: usize,
    /// Server-wide shutdown signal.
    pub shutdown: CancellationToken,
    /// Open connection count, reported by `/health`.
    pub connections: Arc<AtomicUsize>,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The client sent a close frame.
    ClientClosed,
    /// The socket errored or the stream ended without a close frame.
    ConnectionLost,
    /// No heartbeat within the interval.
    HeartbeatTimeout,
    /// The server is shutting down.
    Shutdown,
}

impl DisconnectReason {
    /// Metric label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientClosed => "client_closed",
            Self::ConnectionLost => "connection_lost",
            Self::HeartbeatTimeout => "heartbeat_timeout",
            Self::Shutdown => "shutdown",
        }
    }

    /// Close frame the server sends for this reason, if any.
    fn close_frame(self) -> Option<(u16, &'static str)> {
        match self {
            Self::HeartbeatTimeout => Some((
                protocol::CLOSE_SESSION_TIMEOUT,
                protocol::CLOSE_SESSION_TIMEOUT_REASON,
            )),
            Self::Shutdown => Some((protocol::CLOSE_GOING_AWAY, protocol::CLOSE_GOING_AWAY_REASON)),
            Self::ClientClosed | Self::ConnectionLost => None,
        }
    }
}

/// Run a WebSocket session for a connected client.
///
/// 1. Sends the hello frame with the heartbeat interval
/// 2. Acknowledges heartbeats and moves the liveness deadline
/// 3. Runs analysis requests concurrently; requests past the per-connection
///    bound wait for a free slot
/// 4. Closes with 4009 when the client stops heartbeating, 1001 on shutdown
/// 5. Aborts in-flight analyses and cleans up on disconnect
#[instrument(skip_all, fields(client_id = %client_id))]
pub async fn run_ws_session(ws: WebSocket, client_id: String, ctx: Arc<SessionContext>) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (send_tx, mut send_rx) = mpsc::channel::<Outbound>(ctx.outbound_queue);
    let connection = Arc::new(ClientConnection::new(send_tx));

    let _ = ctx.connections.fetch_add(1, Ordering::Relaxed);
    info!("client connected");
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);

    let heartbeat_ms = u64::try_from(ctx.heartbeat_interval.as_millis()).unwrap_or(u64::MAX);
    let _ = connection.send_text(protocol::hello(heartbeat_ms));

    let mut outbound = tokio::spawn(async move {
        while let Some(item) = send_rx.recv().await {
            match item {
                Outbound::Frame(text) => {
                    let text = Utf8Bytes::from(text.as_str());
                    if ws_tx.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Outbound::Close { code, reason } => {
                    let frame = CloseFrame {
                        code,
                        reason: Utf8Bytes::from_static(reason),
                    };
                    let _ = ws_tx.send(Message::Close(Some(frame))).await;
                    break;
                }
            }
        }
    });

    let heartbeat_cancel = CancellationToken::new();
    let mut heartbeat = tokio::spawn(run_heartbeat(
        connection.clone(),
        ctx.heartbeat_interval,
        heartbeat_cancel.clone(),
    ));

    let permits = Arc::new(Semaphore::new(ctx.max_concurrent_analyses));
    let mut analyses = JoinSet::new();

    let reason = loop {
        tokio::select! {
            msg = ws_rx.next() => {
                let Some(Ok(msg)) = msg else {
                    break DisconnectReason::ConnectionLost;
                };
                let text = match msg {
                    Message::Text(t) => t.as_str().to_owned(),
                    Message::Binary(data) => {
                        if let Ok(s) = std::str::from_utf8(&data) {
                            s.to_owned()
                        } else {
                            debug!(len = data.len(), "ignoring non-UTF8 binary frame");
                            continue;
                        }
                    }
                    Message::Close(_) => {
                        info!("client sent close frame");
                        break DisconnectReason::ClientClosed;
                    }
                    Message::Ping(_) | Message::Pong(_) => continue,
                };

                match handle_message(&text) {
                    FrameAction::Heartbeat => {
                        connection.record_heartbeat();
                        if !connection.send_text(protocol::heartbeat_ack()) {
                            debug!("failed to enqueue heartbeat ack");
                        }
                    }
                    FrameAction::Reply(frame) => {
                        let _ = connection.send_text(frame);
                    }
                    FrameAction::Ignore => {}
                    FrameAction::Analyze(request) => {
                        if permits.available_permits() == 0 {
                            debug!(
                                limit = ctx.max_concurrent_analyses,
                                "analysis queued behind in-flight requests"
                            );
                        }
                        let permits = permits.clone();
                        let analyzer = ctx.analyzer.clone();
                        let conn = connection.clone();
                        let _ = analyses.spawn(async move {
                            let Ok(permit) = permits.acquire_owned().await else {
                                return;
                            };
                            let frame = run_analysis(&analyzer, request).await;
                            drop(permit);
                            if !conn.deliver(frame).await {
                                debug!("writer gone, dropping analysis result");
                            }
                        });
                    }
                }
            }
            result = &mut heartbeat => {
                match result {
                    Ok(HeartbeatResult::TimedOut) => {
                        info!(
                            idle_secs = connection.last_heartbeat().elapsed().as_secs_f64(),
                            "heartbeat timed out, closing session"
                        );
                        counter!(WS_HEARTBEAT_TIMEOUTS_TOTAL).increment(1);
                    }
                    Ok(HeartbeatResult::Cancelled) => {}
                    Err(e) => warn!(error = %e, "heartbeat task failed"),
                }
                break DisconnectReason::HeartbeatTimeout;
            }
            () = ctx.shutdown.cancelled() => break DisconnectReason::Shutdown,
            Some(joined) = analyses.join_next(), if !analyses.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "analysis task failed");
                }
            }
        }
    };

    // Clean up
    if !analyses.is_empty() {
        debug!(in_flight = analyses.len(), "aborting in-flight analyses");
    }
    analyses.abort_all();
    heartbeat_cancel.cancel();
    heartbeat.abort();
    if let Some((code, close_reason)) = reason.close_frame() {
        // A peer that stops reading leaves the writer stuck on the socket and
        // the queue full; both steps share one budget.
        let flushed = tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, async {
            if connection.close(code, close_reason).await {
                let _ = (&mut outbound).await;
            }
        })
        .await;
        if flushed.is_err() {
            debug!("close frame not flushed in time, dropping writer");
            outbound.abort();
        }
    } else {
        outbound.abort();
    }

    let _ = ctx.connections.fetch_sub(1, Ordering::Relaxed);
    info!(reason = reason.as_str(), "client disconnected");
    counter!(WS_DISCONNECTIONS_TOTAL, "reason" => reason.as_str()).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
    histogram!(WS_CONNECTION_DURATION_SECONDS).record(connection.age().as_secs_f64());
}

#[cfg(test)]
mod tests {
    // Full sessions need a real socket; they are covered by
    // tests/integration.rs. Unit tests here cover the helper logic.
    use super::*;

    #[test]
    fn disconnect_labels() {
        assert_eq!(DisconnectReason::ClientClosed.as_str(), "client_closed");
        assert_eq!(DisconnectReason::ConnectionLost.as_str(), "connection_lost");
        assert_eq!(DisconnectReason::HeartbeatTimeout.as_str(), "heartbeat_timeout");
        assert_eq!(DisconnectReason::Shutdown.as_str(), "shutdown");
    }

    #[test]
    fn only_server_closes_send_a_close_frame() {
        assert_eq!(
            DisconnectReason::HeartbeatTimeout.close_frame(),
            Some((4009, "Session timed out"))
        );
        assert_eq!(
            DisconnectReason::Shutdown.close_frame(),
            Some((1001, "Server shutting down"))
        );
        assert_eq!(DisconnectReason::ClientClosed.close_frame(), None);
        assert_eq!(DisconnectReason::ConnectionLost.close_frame(), None);
    }
}
