//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection: inbound
//! text frames go to the [`RelayService`], and texts queued on the
//! connection's outbound channel are written back to the socket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::domain::{ConnectionHandle, ConnectionId};
use crate::error::RelayError;
use crate::service::{RelayService, RouteOutcome};

/// Runs one connection from registration to removal.
///
/// - Registers the connection under a freshly generated id.
/// - Hands every text frame to [`RelayService::on_message`].
/// - Forwards the outbound queue to the client.
/// - Unregisters on close frame, stream end, or write failure.
pub async fn run_connection(
    socket: WebSocket,
    relay: Arc<RelayService>,
    display_name: String,
    outbound_buffer: usize,
) {
    let id = ConnectionId::generate();
    let (handle, mut outbound_rx) =
        ConnectionHandle::channel(id.clone(), display_name.clone(), outbound_buffer);
    relay.on_connect(handle).await;

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        log_outcome(&id, relay.on_message(&id, &display_name, text.as_str()).await);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(conn_id = %id, error = %err, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Text queued for this client by the router
            outbound = outbound_rx.recv() => {
                let Some(text) = outbound else { break };
                if ws_tx.send(Message::text(text)).await.is_err() {
                    break;
                }
            }
        }
    }

    relay.on_disconnect(&id).await;
}

fn log_outcome(id: &ConnectionId, result: Result<RouteOutcome, RelayError>) {
    match result {
        Ok(RouteOutcome::Direct { recipient, report }) => {
            tracing::info!(
                conn_id = %id,
                %recipient,
                delivered = report.delivered,
                failed = report.failed,
                "direct message routed"
            );
        }
        Ok(RouteOutcome::RecipientOffline { recipient }) => {
            tracing::info!(conn_id = %id, %recipient, "direct recipient offline");
        }
        Ok(RouteOutcome::Broadcast { report }) => {
            tracing::info!(
                conn_id = %id,
                delivered = report.delivered,
                failed = report.failed,
                "broadcast routed"
            );
        }
        Err(err @ RelayError::Decode(_)) => {
            tracing::warn!(conn_id = %id, error = %err, "inbound payload dropped");
        }
        Err(err) => {
            tracing::warn!(conn_id = %id, error = %err, "inbound message not delivered");
        }
    }
}
