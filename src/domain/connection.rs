//! Writable handle to one live client session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use utoipa::ToSchema;

use super::ConnectionId;
use crate::error::RelayError;

/// Cloneable write capability for a single connection.
///
/// The transport owns the socket; the handle only holds the sending half
/// of the connection's bounded outbound queue. [`ConnectionHandle::send_text`]
/// never waits: a full or closed queue is reported as a
/// [`RelayError::Delivery`] and the text is dropped.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    display_name: String,
    connected_at: DateTime<Utc>,
    outbound: mpsc::Sender<String>,
}

impl ConnectionHandle {
    /// Creates a handle together with the receiving end of its outbound
    /// queue. The transport drains the receiver into the socket.
    #[must_use]
    pub fn channel(
        id: ConnectionId,
        display_name: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        let (outbound, rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            id,
            display_name: display_name.into(),
            connected_at: Utc::now(),
            outbound,
        };
        (handle, rx)
    }

    /// Connection identifier.
    #[must_use]
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Human-readable label supplied at connect time. Not unique.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// When the connection was registered.
    #[must_use]
    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Enqueues `text` for delivery to the client.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Delivery`] if the outbound queue is full or
    /// the connection has already closed.
    pub fn send_text(&self, text: impl Into<String>) -> Result<(), RelayError> {
        self.outbound.try_send(text.into()).map_err(|err| {
            let reason = match err {
                mpsc::error::TrySendError::Full(_) => "outbound queue full",
                mpsc::error::TrySendError::Closed(_) => "connection closed",
            };
            RelayError::Delivery {
                id: self.id.clone(),
                reason: reason.to_string(),
            }
        })
    }

    /// Returns `true` if both handles write into the same queue.
    #[must_use]
    pub fn same_connection(&self, other: &Self) -> bool {
        self.outbound.same_channel(&other.outbound)
    }

    /// Returns `true` once the transport has dropped the receiving end.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

/// Lightweight view of a connection for the REST API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionSummary {
    /// Connection identifier.
    pub id: String,
    /// Display name supplied at connect time.
    pub display_name: String,
    /// Registration timestamp.
    pub connected_at: DateTime<Utc>,
}

impl From<&ConnectionHandle> for ConnectionSummary {
    fn from(handle: &ConnectionHandle) -> Self {
        Self {
            id: handle.id.to_string(),
            display_name: handle.display_name.clone(),
            connected_at: handle.connected_at,
        }
    }
}
