//! Message router: decodes inbound payloads and fans them out.

use std::sync::Arc;

use crate::domain::notice::{RECIPIENT_OFFLINE, chat_line};
use crate::domain::{ConnectionHandle, ConnectionId, ConnectionRegistry, MessageKind, RoutedMessage};
use crate::error::RelayError;

/// Per-message write tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Writes accepted by the recipient's outbound queue.
    pub delivered: usize,
    /// Writes that failed (queue full or connection closed).
    pub failed: usize,
}

impl DeliveryReport {
    fn record(&mut self, handle: &ConnectionHandle, text: &str) {
        match handle.send_text(text) {
            Ok(()) => self.delivered = self.delivered.saturating_add(1),
            Err(err) => {
                self.failed = self.failed.saturating_add(1);
                tracing::warn!(conn_id = %handle.id(), error = %err, "write dropped");
            }
        }
    }
}

/// Result of routing a single inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Recipient was live; the line went to it and back to the sender.
    Direct {
        /// Addressed connection.
        recipient: ConnectionId,
        /// Writes to sender and recipient.
        report: DeliveryReport,
    },
    /// Recipient was not registered; the sender got the offline notice.
    RecipientOffline {
        /// Addressed connection.
        recipient: ConnectionId,
    },
    /// Line went to every connection in the registry snapshot.
    Broadcast {
        /// Writes across the snapshot.
        report: DeliveryReport,
    },
}

/// Resolves recipients through the [`ConnectionRegistry`] and writes
/// outbound text.
///
/// Stateless apart from the shared registry; one router serves every
/// connection and any number of messages concurrently.
#[derive(Debug, Clone)]
pub struct MessageRouter {
    registry: Arc<ConnectionRegistry>,
}

impl MessageRouter {
    /// Creates a router over `registry`.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Decodes and delivers one inbound payload from `from`.
    ///
    /// Individual write failures are logged and counted in the returned
    /// [`DeliveryReport`]; they never stop delivery to other recipients.
    ///
    /// # Errors
    ///
    /// - [`RelayError::Decode`] if `raw` is malformed; nothing is written.
    /// - [`RelayError::Delivery`] if a direct message's sender is no longer
    ///   registered; nothing is written.
    pub async fn handle_inbound(
        &self,
        from: &ConnectionId,
        display_name: &str,
        raw: &str,
    ) -> Result<RouteOutcome, RelayError> {
        let message = RoutedMessage::decode(raw, from)?;
        self.route(message, display_name).await
    }

    /// Delivers an already-decoded message.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Delivery`] if a direct message's sender is no
    /// longer registered.
    pub async fn route(
        &self,
        message: RoutedMessage,
        display_name: &str,
    ) -> Result<RouteOutcome, RelayError> {
        let line = chat_line(display_name, &message.body);
        match message.kind {
            MessageKind::Direct { to } => self.deliver_direct(&message.from, to, &line).await,
            MessageKind::Broadcast => Ok(self.deliver_broadcast(&line).await),
        }
    }

    async fn deliver_direct(
        &self,
        from: &ConnectionId,
        to: ConnectionId,
        line: &str,
    ) -> Result<RouteOutcome, RelayError> {
        let sender = self
            .registry
            .get(from)
            .await
            .map_err(|_| RelayError::Delivery {
                id: from.clone(),
                reason: "sender is no longer registered".to_string(),
            })?;

        match self.registry.get(&to).await {
            Ok(recipient) => {
                let mut report = DeliveryReport::default();
                report.record(&sender, line);
                report.record(&recipient, line);
                tracing::debug!(conn_id = %from, recipient = %to, "direct message delivered");
                Ok(RouteOutcome::Direct {
                    recipient: to,
                    report,
                })
            }
            Err(RelayError::NotFound(_)) => {
                if let Err(err) = sender.send_text(RECIPIENT_OFFLINE) {
                    tracing::warn!(conn_id = %from, error = %err, "offline notice dropped");
                }
                tracing::debug!(conn_id = %from, recipient = %to, "direct recipient offline");
                Ok(RouteOutcome::RecipientOffline { recipient: to })
            }
            Err(err) => Err(err),
        }
    }

    async fn deliver_broadcast(&self, line: &str) -> RouteOutcome {
        let mut report = DeliveryReport::default();
        for handle in self.registry.snapshot().await {
            report.record(&handle, line);
        }
        tracing::debug!(
            delivered = report.delivered,
            failed = report.failed,
            "broadcast delivered"
        );
        RouteOutcome::Broadcast { report }
    }
}
