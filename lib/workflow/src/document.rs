//! Workflow wire format.
//!
//! `WorkflowDocument` is the JSON shape exchanged with the editor, storage
//! and the execution service:
//!
//! ```json
//! { "nodes": [{ "id", "type", "config", "position": { "x", "y" } }],
//!   "connections": [{ "source", "target", "sourcePort", "targetPort" }],
//!   "variables": {} }
//! ```
//!
//! Positions and port names are optional on the wire. Missing ports mean
//! `output` -> `input`; missing positions are laid out by `GridLayout`.

use crate::connection::Connection;
use crate::node::{NodeConfig, Position, WorkflowNode};
use crate::port::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use serde::{Deserialize, Serialize};
use swarm_core::{NodeId, NodeTypeId};

fn default_columns() -> usize {
    3
}

fn default_origin() -> f64 {
    100.0
}

fn default_column_width() -> f64 {
    250.0
}

fn default_row_height() -> f64 {
    150.0
}

/// Fallback grid used for nodes loaded without a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_origin")]
    pub origin_x: f64,
    #[serde(default = "default_origin")]
    pub origin_y: f64,
    #[serde(default = "default_column_width")]
    pub column_width: f64,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            origin_x: default_origin(),
            origin_y: default_origin(),
            column_width: default_column_width(),
            row_height: default_row_height(),
        }
    }
}

impl GridLayout {
    /// Position of the node at `index` in document order.
    #[must_use]
    pub fn position_for(&self, index: usize) -> Position {
        let columns = self.columns.max(1);
        let column = index % columns;
        let row = index / columns;
        Position::new(
            self.origin_x + column as f64 * self.column_width,
            self.origin_y + row as f64 * self.row_height,
        )
    }
}

/// A node as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeTypeId,
    #[serde(default)]
    pub config: NodeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl NodeDocument {
    /// Converts to a graph node, placing it with `layout` if it has no position.
    #[must_use]
    pub fn to_node(&self, index: usize, layout: &GridLayout) -> WorkflowNode {
        let position = self.position.unwrap_or_else(|| layout.position_for(index));
        WorkflowNode::new(self.id.clone(), self.node_type.clone(), position)
            .with_config(self.config.clone())
    }
}

impl From<&WorkflowNode> for NodeDocument {
    fn from(node: &WorkflowNode) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            config: node.config.clone(),
            position: Some(node.position),
        }
    }
}

/// A connection as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDocument {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
}

impl ConnectionDocument {
    /// Converts to a connection, filling in default port names.
    #[must_use]
    pub fn to_connection(&self) -> Connection {
        Connection::new(
            self.source.clone(),
            self.source_port.as_deref().unwrap_or(DEFAULT_OUTPUT),
            self.target.clone(),
            self.target_port.as_deref().unwrap_or(DEFAULT_INPUT),
        )
    }
}

impl From<&Connection> for ConnectionDocument {
    fn from(connection: &Connection) -> Self {
        Self {
            source: connection.source.clone(),
            target: connection.target.clone(),
            source_port: Some(connection.source_port.clone()),
            target_port: Some(connection.target_port.clone()),
        }
    }
}

/// A complete workflow on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub connections: Vec<ConnectionDocument>,
    #[serde(default)]
    pub variables: NodeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grid_layout_wraps_every_three_columns() {
        let layout = GridLayout::default();
        assert_eq!(layout.position_for(0), Position::new(100.0, 100.0));
        assert_eq!(layout.position_for(2), Position::new(600.0, 100.0));
        assert_eq!(layout.position_for(4), Position::new(350.0, 250.0));
    }

    #[test]
    fn zero_columns_acts_as_one() {
        let layout = GridLayout {
            columns: 0,
            ..GridLayout::default()
        };
        assert_eq!(layout.position_for(1), Position::new(100.0, 250.0));
    }

    #[test]
    fn layout_fields_default_individually() {
        let layout: GridLayout = serde_json::from_value(json!({ "columns": 4 })).expect("layout");
        assert_eq!(layout.columns, 4);
        assert_eq!(layout.row_height, 150.0);
    }

    #[test]
    fn connection_ports_default() {
        let doc: ConnectionDocument =
            serde_json::from_value(json!({ "source": "a", "target": "b" })).expect("connection");
        let connection = doc.to_connection();
        assert_eq!(connection.source_port, "output");
        assert_eq!(connection.target_port, "input");
    }

    #[test]
    fn document_reads_wire_names() {
        let doc: WorkflowDocument = serde_json::from_value(json!({
            "nodes": [{ "id": "a", "type": "manual_trigger" }],
            "connections": [{ "source": "a", "target": "b", "sourcePort": "true" }]
        }))
        .expect("document");
        assert_eq!(doc.nodes[0].node_type, "manual_trigger");
        assert!(doc.nodes[0].position.is_none());
        assert_eq!(doc.connections[0].source_port.as_deref(), Some("true"));
        assert!(doc.variables.is_empty());
    }

    #[test]
    fn blank_node_id_is_rejected() {
        let result = serde_json::from_value::<WorkflowDocument>(json!({
            "nodes": [{ "id": "", "type": "wait" }]
        }));
        assert!(result.is_err());
    }
}
