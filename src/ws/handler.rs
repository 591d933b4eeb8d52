//! Axum WebSocket upgrade handlers.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws/{nickname}` — Upgrade HTTP connection to WebSocket.
///
/// `nickname` becomes the display name prefixed to every line this
/// connection sends.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(nickname): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    upgrade(ws, nickname, state)
}

/// `GET /websocket/{nickname}/{uid}` — Legacy endpoint shape. The `uid`
/// segment is only logged; the relay assigns its own connection id.
pub async fn legacy_ws_handler(
    ws: WebSocketUpgrade,
    Path((nickname, uid)): Path<(String, String)>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    tracing::debug!(%nickname, %uid, "legacy websocket upgrade");
    upgrade(ws, nickname, state)
}

fn upgrade(ws: WebSocketUpgrade, nickname: String, state: AppState) -> impl IntoResponse {
    let relay = Arc::clone(&state.relay);
    let outbound_buffer = state.config.outbound_buffer;

    ws.max_message_size(state.config.max_message_bytes)
        .on_upgrade(move |socket| run_connection(socket, relay, nickname, outbound_buffer))
}
