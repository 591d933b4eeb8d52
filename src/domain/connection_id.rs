//! Type-safe connection identifier.
//!
//! [`ConnectionId`] is a newtype wrapper around the string id the transport
//! assigns to every live session. Clients address direct messages with it,
//! so it also has to accept arbitrary client-supplied strings.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a live connection.
///
/// Generated once when the WebSocket upgrade completes and stable for the
/// lifetime of the connection. Used as the key in
/// [`super::ConnectionRegistry`] and as the `toUser` routing target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Creates a new random `ConnectionId` (UUID v4, simple form).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for ConnectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn generate_is_unique() {
        assert_ne!(ConnectionId::generate(), ConnectionId::generate());
    }

    #[test]
    fn generated_ids_are_simple_uuids() {
        let id = ConnectionId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(!id.as_str().contains('-'));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ConnectionId::from("b7");
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"b7\"");
    }

    #[test]
    fn borrow_allows_str_lookup() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(ConnectionId::from("a1"), 1);
        assert_eq!(map.get("a1"), Some(&1));
    }
}
