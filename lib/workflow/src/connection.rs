//! Connections between node ports.
//!
//! A connection carries data from a source node's output port to a target
//! node's input port. Several connections may share a source (fan-out).
//! The graph keeps connections in insertion order, which breaks ties during
//! traversal.

use crate::port::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use serde::{Deserialize, Serialize};
use swarm_core::NodeId;

/// A directed link from one node's output port to another node's input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// The source node ID.
    pub source: NodeId,
    /// The output port on the source node.
    pub source_port: String,
    /// The target node ID.
    pub target: NodeId,
    /// The input port on the target node.
    pub target_port: String,
}

impl Connection {
    /// Creates a new connection.
    #[must_use]
    pub fn new(
        source: impl Into<NodeId>,
        source_port: impl Into<String>,
        target: impl Into<NodeId>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_port: source_port.into(),
            target: target.into(),
            target_port: target_port.into(),
        }
    }

    /// Creates a connection using default port names ("output" -> "input").
    #[must_use]
    pub fn with_default_ports(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::new(source, DEFAULT_OUTPUT, target, DEFAULT_INPUT)
    }

    /// Returns true if either end of the connection is the given node.
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == *node_id || self.target == *node_id
    }

    /// Returns true if this connection links exactly these ports.
    #[must_use]
    pub fn links(&self, source: &str, source_port: &str, target: &str, target_port: &str) -> bool {
        self.source == *source
            && self.source_port == source_port
            && self.target == *target
            && self.target_port == target_port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_default_ports() {
        let connection = Connection::with_default_ports("start", "A");
        assert_eq!(connection.source_port, "output");
        assert_eq!(connection.target_port, "input");
    }

    #[test]
    fn connection_touches_both_ends() {
        let connection = Connection::new("cond", "true", "A", "input");
        assert!(connection.touches("cond"));
        assert!(connection.touches("A"));
        assert!(!connection.touches("B"));
    }

    #[test]
    fn connection_links_exact_ports() {
        let connection = Connection::new("cond", "true", "A", "input");
        assert!(connection.links("cond", "true", "A", "input"));
        assert!(!connection.links("cond", "false", "A", "input"));
    }

    #[test]
    fn connection_serializes_camel_case() {
        let connection = Connection::new("cond", "false", "B", "input");
        let json = serde_json::to_value(&connection).expect("serialize");
        assert_eq!(json["sourcePort"], "false");
        assert_eq!(json["targetPort"], "input");
    }
}
