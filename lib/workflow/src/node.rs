//! Workflow node instances.
//!
//! A node is one placed step in a graph: an id unique within the graph, a
//! reference to its node type, a canvas position and a config map that is
//! expected to match the type's config schema.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use swarm_core::{NodeId, NodeTypeId};

/// Configuration values of a node, keyed by schema field.
pub type NodeConfig = serde_json::Map<String, JsonValue>;

/// Canvas coordinates of a node. Presentation only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node placed in a workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Unique identifier for this node within the graph.
    pub id: NodeId,
    /// The node type this node instantiates.
    #[serde(rename = "type")]
    pub node_type: NodeTypeId,
    /// Where the node sits on the canvas.
    pub position: Position,
    /// Config values for the node type's schema fields.
    #[serde(default)]
    pub config: NodeConfig,
}

impl WorkflowNode {
    /// Creates a node with an empty config.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<NodeTypeId>, position: Position) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            position,
            config: NodeConfig::new(),
        }
    }

    /// Sets the config.
    #[must_use]
    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns a config value by key.
    #[must_use]
    pub fn config_value(&self, key: &str) -> Option<&JsonValue> {
        self.config.get(key)
    }
}
