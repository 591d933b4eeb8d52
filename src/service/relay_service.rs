//! Relay service: the transport-facing entry points for connection
//! lifecycle and inbound messages.

use std::sync::Arc;

use super::router::{MessageRouter, RouteOutcome};
use crate::domain::notice::welcome;
use crate::domain::{ConnectionHandle, ConnectionId, ConnectionRegistry};
use crate::error::RelayError;

/// Coordinates the [`ConnectionRegistry`] and the [`MessageRouter`].
///
/// The transport calls [`on_connect`](Self::on_connect) once a socket is
/// open, [`on_message`](Self::on_message) for every text frame and
/// [`on_disconnect`](Self::on_disconnect) when the socket goes away for any
/// reason.
#[derive(Debug, Clone)]
pub struct RelayService {
    registry: Arc<ConnectionRegistry>,
    router: MessageRouter,
}

impl RelayService {
    /// Creates a new `RelayService` over a shared registry.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        let router = MessageRouter::new(Arc::clone(&registry));
        Self { registry, router }
    }

    /// Returns a reference to the inner [`ConnectionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Returns a reference to the inner [`MessageRouter`].
    #[must_use]
    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    /// Registers a freshly opened connection and greets it with its id.
    pub async fn on_connect(&self, handle: ConnectionHandle) {
        let id = handle.id().clone();
        let greeting = welcome(handle.display_name(), &id);
        tracing::info!(conn_id = %id, display_name = handle.display_name(), "connection opened");

        let _ = self.registry.add(id.clone(), handle.clone()).await;
        if let Err(err) = handle.send_text(greeting) {
            tracing::warn!(conn_id = %id, error = %err, "welcome notice dropped");
        }
    }

    /// Removes a connection from the registry. Safe to call more than once.
    pub async fn on_disconnect(&self, id: &ConnectionId) {
        if self.registry.remove(id).await.is_some() {
            tracing::info!(conn_id = %id, "connection closed");
        } else {
            tracing::debug!(conn_id = %id, "disconnect for unknown connection ignored");
        }
    }

    /// Routes one inbound text payload from connection `id`.
    ///
    /// # Errors
    ///
    /// Propagates the router's [`RelayError::Decode`] and
    /// [`RelayError::Delivery`] outcomes; the caller logs them and keeps
    /// the connection open.
    pub async fn on_message(
        &self,
        id: &ConnectionId,
        display_name: &str,
        raw: &str,
    ) -> Result<RouteOutcome, RelayError> {
        tracing::debug!(conn_id = %id, display_name, bytes = raw.len(), "inbound message");
        self.router.handle_inbound(id, display_name, raw).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_registers_and_welcomes() {
        let service = RelayService::new(Arc::new(ConnectionRegistry::new()));
        let id = ConnectionId::from("abc");
        let (handle, mut rx) = ConnectionHandle::channel(id.clone(), "Alice", 4);

        service.on_connect(handle).await;

        assert!(service.registry().get(&id).await.is_ok());
        assert_eq!(
            rx.recv().await.as_deref(),
            Some("Alice is online (channel id: abc)")
        );
    }

    #[tokio::test]
    async fn disconnect_twice_is_harmless() {
        let service = RelayService::new(Arc::new(ConnectionRegistry::new()));
        let id = ConnectionId::from("abc");
        let (handle, _rx) = ConnectionHandle::channel(id.clone(), "Alice", 4);
        service.on_connect(handle).await;

        service.on_disconnect(&id).await;
        service.on_disconnect(&id).await;

        assert!(service.registry().is_empty().await);
    }

    #[tokio::test]
    async fn message_after_disconnect_is_not_delivered_to_sender() {
        let service = RelayService::new(Arc::new(ConnectionRegistry::new()));
        let a = ConnectionId::from("a");
        let b = ConnectionId::from("b");
        let (ha, _rx_a) = ConnectionHandle::channel(a.clone(), "Alice", 4);
        let (hb, mut rx_b) = ConnectionHandle::channel(b.clone(), "Bob", 4);
        service.on_connect(ha).await;
        service.on_connect(hb).await;
        let _welcome = rx_b.recv().await;

        service.on_disconnect(&a).await;
        let result = service
            .on_message(&a, "Alice", r#"{"type":1,"toUser":"b","msg":"late"}"#)
            .await;

        assert!(matches!(result, Err(RelayError::Delivery { .. })));
        assert!(rx_b.try_recv().is_err());
    }
}
