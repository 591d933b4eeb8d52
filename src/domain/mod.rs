//! Domain layer: connection identity, the connection registry, and the
//! routed message model.
//!
//! This module contains the relay's server-side model: the identifier and
//! write handle of a live connection, the concurrent registry that maps one
//! to the other, and the decoded form of inbound payloads.

pub mod connection;
pub mod connection_id;
pub mod connection_registry;
pub mod message;
pub mod notice;

pub use connection::{ConnectionHandle, ConnectionSummary};
pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
pub use message::{MessageKind, RoutedMessage, WirePayload};
