//! WebSocket gateway: framing, connection state, heartbeat, dispatch and session lifecycle.

pub mod connection;
pub mod handler;
pub mod heartbeat;
pub mod protocol;
pub mod session;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::server::AppState;

/// `GET /` with an upgrade request.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let client_id = Uuid::now_v7().to_string();
    let max_frame = state.config.max_frame_bytes;
    let ctx = state.session.clone();
    ws.max_message_size(max_frame)
        .max_frame_size(max_frame)
        .on_upgrade(move |socket| session::run_ws_session(socket, client_id, ctx))
}
