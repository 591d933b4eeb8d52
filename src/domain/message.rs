//! Inbound wire payload and its decoded routing form.
//!
//! Clients send JSON objects of the shape
//! `{"type": 1, "toUser": "<id>", "msg": "...", "fromUser": "..."}`.
//! `type == 1` addresses a single connection; any other value broadcasts.
//! `fromUser` is accepted for compatibility but never trusted.

use serde::Deserialize;

use super::ConnectionId;
use crate::error::RelayError;

/// Wire value of `type` that selects direct delivery.
pub const DIRECT_TYPE: i64 = 1;

/// Raw inbound payload as sent by clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePayload {
    /// Routing discriminator. Missing is treated as broadcast.
    #[serde(rename = "type", default)]
    pub msg_type: i64,
    /// Recipient connection id; required for direct messages.
    #[serde(default)]
    pub to_user: Option<String>,
    /// Message body.
    pub msg: String,
    /// Client-claimed sender. Ignored by routing.
    #[serde(default)]
    pub from_user: Option<String>,
}

/// Routing intent of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// Delivered to one recipient (and echoed to the sender).
    Direct {
        /// Target connection.
        to: ConnectionId,
    },
    /// Delivered to every live connection, sender included.
    Broadcast,
}

/// Decoded form of one inbound message. Built per message, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedMessage {
    /// Unicast or broadcast.
    pub kind: MessageKind,
    /// Originating connection, always taken from the transport.
    pub from: ConnectionId,
    /// Text payload.
    pub body: String,
}

impl RoutedMessage {
    /// Decodes `raw` into a routed message sent by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Decode`] if `raw` is not a valid payload
    /// object, or if a direct message carries no recipient.
    pub fn decode(raw: &str, from: &ConnectionId) -> Result<Self, RelayError> {
        let payload: WirePayload = serde_json::from_str(raw)?;
        Self::from_wire(payload, from)
    }

    /// Converts an already-parsed payload, overriding its sender.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Decode`] for a direct message without a
    /// non-empty `toUser`.
    pub fn from_wire(payload: WirePayload, from: &ConnectionId) -> Result<Self, RelayError> {
        let kind = if payload.msg_type == DIRECT_TYPE {
            match payload.to_user {
                Some(to) if !to.is_empty() => MessageKind::Direct {
                    to: ConnectionId::from(to),
                },
                _ => {
                    return Err(RelayError::Decode(
                        "direct message requires a `toUser` recipient".to_string(),
                    ));
                }
            }
        } else {
            MessageKind::Broadcast
        };

        Ok(Self {
            kind,
            from: from.clone(),
            body: payload.msg,
        })
    }
}
