//! Connection identity and the bridged-client classification seam.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Opaque connection identifier (UUID-sized).
///
/// Textual form is 32 hex digits; UUID-style dashes are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionId(pub u128);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl FromStr for ConnectionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.trim().chars().filter(|&c| c != '-').collect();
        u128::from_str_radix(&digits, 16).map(Self)
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConnectionId> for String {
    fn from(id: ConnectionId) -> Self {
        id.to_string()
    }
}

/// Answers whether a connection reaches the server through the bridge.
///
/// Queried once per outbound packet and never cached by the transform.
pub trait BridgeClassifier {
    /// `true` if the connection speaks the bridged dialect.
    fn is_bridged(&self, connection: ConnectionId) -> bool;
}

impl<F> BridgeClassifier for F
where
    F: Fn(ConnectionId) -> bool,
{
    fn is_bridged(&self, connection: ConnectionId) -> bool {
        self(connection)
    }
}

/// Thread-safe set of bridged connections maintained by the host.
#[derive(Debug, Default)]
pub struct BridgedConnections {
    connections: RwLock<HashSet<ConnectionId>>,
}

impl BridgedConnections {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a connection as bridged. Returns `false` if it already was.
    pub fn insert(&self, connection: ConnectionId) -> bool {
        self.connections.write().insert(connection)
    }

    /// Forget a connection. Returns `false` if it was not registered.
    pub fn remove(&self, connection: ConnectionId) -> bool {
        self.connections.write().remove(&connection)
    }

    /// Number of bridged connections.
    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    /// Whether no connection is bridged.
    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }
}

impl BridgeClassifier for BridgedConnections {
    fn is_bridged(&self, connection: ConnectionId) -> bool {
        self.connections.read().contains(&connection)
    }
}
