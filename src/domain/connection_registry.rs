//! Concurrent directory of live connections.
//!
//! [`ConnectionRegistry`] maps a [`ConnectionId`] to its [`ConnectionHandle`]
//! behind a single [`tokio::sync::RwLock`]. Lookups and snapshots take the
//! read lock and clone handles out, so no lock is ever held while a message
//! is written.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::{ConnectionHandle, ConnectionId, ConnectionSummary};
use crate::error::RelayError;

/// Process-wide registry of open connections.
///
/// Constructed once at startup and shared through `Arc`.
///
/// # Concurrency
///
/// - Any number of `get` / `snapshot` calls run concurrently.
/// - `add` / `remove` are serialized against each other and against readers,
///   but each holds the lock only for a single map operation.
/// - Entries are kept in a `BTreeMap`, so snapshots iterate in id order.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<BTreeMap<ConnectionId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` under `id`.
    ///
    /// An existing entry for the same id is replaced (last write wins) and
    /// returned.
    pub async fn add(&self, id: ConnectionId, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let replaced = self.connections.write().await.insert(id.clone(), handle);
        if replaced.is_some() {
            tracing::warn!(conn_id = %id, "connection id re-registered, previous entry replaced");
        }
        replaced
    }

    /// Removes the entry for `id`, returning it if one was present.
    ///
    /// Removing an absent id is a no-op.
    pub async fn remove(&self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.connections.write().await.remove(id)
    }

    /// Looks up the live connection registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::NotFound`] if no connection with the given id
    /// is registered.
    pub async fn get(&self, id: &ConnectionId) -> Result<ConnectionHandle, RelayError> {
        self.connections
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RelayError::NotFound(id.clone()))
    }

    /// Returns a point-in-time copy of every registered connection.
    ///
    /// The copy is detached from the live map: callers may iterate it while
    /// other tasks keep adding and removing entries.
    pub async fn snapshot(&self) -> Vec<ConnectionHandle> {
        self.connections.read().await.values().cloned().collect()
    }

    /// Returns REST summaries of all connections in snapshot order.
    pub async fn summaries(&self) -> Vec<ConnectionSummary> {
        self.connections
            .read()
            .await
            .values()
            .map(ConnectionSummary::from)
            .collect()
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connection is registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}
