//! Workflow graph model.
//!
//! A workflow is a set of uniquely identified nodes and an ordered list of
//! connections between their ports. Connection order is insertion order and
//! breaks ties during traversal, so it is preserved through every operation
//! and through the wire format.
//!
//! Every mutator either applies fully or returns a `StructuralError` and
//! leaves the graph untouched.

use crate::connection::Connection;
use crate::document::{ConnectionDocument, GridLayout, NodeDocument, WorkflowDocument};
use crate::error::StructuralError;
use crate::node::{NodeConfig, Position, WorkflowNode};
use crate::node_type::NodeType;
use crate::port::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::registry::NodeTypeRegistry;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use swarm_core::NodeId;
use tracing::debug;

/// A node taken out of the graph together with the connections it took along.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: WorkflowNode,
    pub connections: Vec<Connection>,
}

/// A workflow graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "WorkflowDocument", try_from = "WorkflowDocument")]
pub struct WorkflowGraph {
    /// Nodes in declaration order.
    nodes: Vec<WorkflowNode>,
    /// Map from NodeId to position in `nodes`.
    index: HashMap<NodeId, usize>,
    /// Connections in insertion order.
    connections: Vec<Connection>,
    /// Workflow-level variables, carried through untouched.
    variables: NodeConfig,
}

impl WorkflowGraph {
    /// Creates a new empty workflow graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a new node of `node_type`, with an empty config.
    ///
    /// A fresh id is generated when `id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the supplied id is already taken.
    pub fn add_node(
        &mut self,
        node_type: &NodeType,
        id: Option<NodeId>,
        position: Position,
    ) -> Result<NodeId, StructuralError> {
        let id = match id {
            Some(id) => id,
            None => self.generate_id(node_type),
        };
        self.insert_node(WorkflowNode::new(id.clone(), node_type.id.clone(), position))?;
        Ok(id)
    }

    /// Inserts a fully built node.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if a node with the same id exists.
    pub fn insert_node(&mut self, node: WorkflowNode) -> Result<(), StructuralError> {
        if self.index.contains_key(&node.id) {
            return Err(StructuralError::DuplicateId { node_id: node.id });
        }
        debug!(node_id = %node.id, node_type = %node.node_type, "adding node");
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn generate_id(&self, node_type: &NodeType) -> NodeId {
        loop {
            let id = NodeId::generate(node_type.id.as_str());
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Connects `source_port` of `source` to `target_port` of `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `source` and `target` are the same node (`SelfConnection`)
    /// - either node does not exist (`DanglingReference`)
    /// - either node's type is not registered (`UnknownNodeType`)
    /// - a port is not declared by its node type (`UnknownPort`)
    /// - the target port takes one connection and already has it (`SingleInputViolation`)
    pub fn connect(
        &mut self,
        registry: &NodeTypeRegistry,
        source: &NodeId,
        source_port: &str,
        target: &NodeId,
        target_port: &str,
    ) -> Result<(), StructuralError> {
        if source == target {
            return Err(StructuralError::SelfConnection {
                node_id: source.clone(),
            });
        }

        let source_type = self.resolve_type(registry, source)?;
        let target_type = self.resolve_type(registry, target)?;

        if source_type.output_port(source_port).is_none() {
            return Err(StructuralError::UnknownPort {
                node_id: source.clone(),
                port_name: source_port.to_string(),
            });
        }
        if target_type.input_port(target_port).is_none() {
            return Err(StructuralError::UnknownPort {
                node_id: target.clone(),
                port_name: target_port.to_string(),
            });
        }

        if target_type.is_single_input(target_port)
            && self
                .incoming(target.as_str())
                .any(|connection| connection.target_port == target_port)
        {
            return Err(StructuralError::SingleInputViolation {
                node_id: target.clone(),
                port_name: target_port.to_string(),
            });
        }

        debug!(%source, source_port, %target, target_port, "connecting nodes");
        self.connections.push(Connection::new(
            source.clone(),
            source_port,
            target.clone(),
            target_port,
        ));
        Ok(())
    }

    fn resolve_type<'r>(
        &self,
        registry: &'r NodeTypeRegistry,
        node_id: &NodeId,
    ) -> Result<&'r NodeType, StructuralError> {
        let node = self.node(node_id.as_str()).ok_or_else(|| StructuralError::DanglingReference {
            node_id: node_id.clone(),
        })?;
        registry
            .find(node.node_type.as_str())
            .ok_or_else(|| StructuralError::UnknownNodeType {
                node_id: node_id.clone(),
                node_type: node.node_type.clone(),
            })
    }

    /// Removes the first connection linking exactly these ports.
    ///
    /// Returns the removed connection, or `None` if nothing matched.
    pub fn disconnect(
        &mut self,
        source: &str,
        source_port: &str,
        target: &str,
        target_port: &str,
    ) -> Option<Connection> {
        let position = self
            .connections
            .iter()
            .position(|connection| connection.links(source, source_port, target, target_port))?;
        Some(self.connections.remove(position))
    }

    /// Removes a node and every connection touching it.
    pub fn remove_node(&mut self, node_id: &str) -> Option<RemovedNode> {
        let position = self.index.remove(node_id)?;
        let node = self.nodes.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|connection| connection.touches(node_id));
        self.connections = kept;

        debug!(%node_id, connections = removed.len(), "removed node");
        Some(RemovedNode {
            node,
            connections: removed,
        })
    }

    /// Replaces a node's config wholesale, returning the previous config.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node does not exist.
    pub fn configure(
        &mut self,
        node_id: &str,
        config: NodeConfig,
    ) -> Result<NodeConfig, StructuralError> {
        let node = self.node_mut(node_id)?;
        Ok(std::mem::replace(&mut node.config, config))
    }

    fn node_mut(&mut self, node_id: &str) -> Result<&mut WorkflowNode, StructuralError> {
        let position = *self
            .index
            .get(node_id)
            .ok_or_else(|| StructuralError::NodeNotFound {
                node_id: NodeId::new(node_id),
            })?;
        Ok(&mut self.nodes[position])
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, node_id: &str) -> Option<&WorkflowNode> {
        self.index.get(node_id).map(|&position| &self.nodes[position])
    }

    /// Returns true if the graph has a node with this id.
    #[must_use]
    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    /// Returns all nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &WorkflowNode> {
        self.nodes.iter()
    }

    /// Returns all connections in insertion order.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Returns the connections arriving at a node.
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |connection| connection.target == *node_id)
    }

    /// Returns the connections leaving a node.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |connection| connection.source == *node_id)
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of connections in the graph.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Returns the workflow-level variables.
    #[must_use]
    pub fn variables(&self) -> &NodeConfig {
        &self.variables
    }

    /// Replaces the workflow-level variables.
    pub fn set_variables(&mut self, variables: NodeConfig) {
        self.variables = variables;
    }

    /// Builds a petgraph snapshot of the graph for structural analysis.
    ///
    /// Node weights are node ids, edge weights the connections; node indices
    /// follow declaration order.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<NodeId, Connection> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.connections.len());
        let indices: Vec<NodeIndex> = self
            .nodes
            .iter()
            .map(|node| graph.add_node(node.id.clone()))
            .collect();
        for connection in &self.connections {
            let endpoints = (
                self.index.get(&connection.source),
                self.index.get(&connection.target),
            );
            if let (Some(&source), Some(&target)) = endpoints {
                graph.add_edge(indices[source], indices[target], connection.clone());
            }
        }
        graph
    }

    /// Serializes the graph to its wire document.
    #[must_use]
    pub fn to_document(&self) -> WorkflowDocument {
        WorkflowDocument {
            nodes: self.nodes.iter().map(NodeDocument::from).collect(),
            connections: self.connections.iter().map(ConnectionDocument::from).collect(),
            variables: self.variables.clone(),
        }
    }

    /// Builds a graph from a wire document, laying out unplaced nodes on the default grid.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate node ids, self connections or
    /// connections naming unknown nodes.
    pub fn from_document(document: &WorkflowDocument) -> Result<Self, StructuralError> {
        Self::from_document_with_layout(document, &GridLayout::default())
    }

    /// Builds a graph from a wire document using `layout` for unplaced nodes.
    ///
    /// Port cardinality is not checked since no registry is at hand; use
    /// [`WorkflowGraph::load`] for that.
    ///
    /// # Errors
    ///
    /// Same as [`WorkflowGraph::from_document`].
    pub fn from_document_with_layout(
        document: &WorkflowDocument,
        layout: &GridLayout,
    ) -> Result<Self, StructuralError> {
        let mut graph = Self::with_nodes(document, layout)?;
        for connection in document.connections.iter().map(ConnectionDocument::to_connection) {
            if connection.source == connection.target {
                return Err(StructuralError::SelfConnection {
                    node_id: connection.source,
                });
            }
            for end in [&connection.source, &connection.target] {
                if !graph.contains(end.as_str()) {
                    return Err(StructuralError::DanglingReference {
                        node_id: end.clone(),
                    });
                }
            }
            graph.connections.push(connection);
        }
        Ok(graph)
    }

    /// Builds a graph from a wire document, replaying every connection
    /// through [`WorkflowGraph::connect`] so port names and cardinality are
    /// checked against the registry.
    ///
    /// A connection without `sourcePort`/`targetPort` uses the first output
    /// or input its node type declares, so `true` for a branching node.
    ///
    /// # Errors
    ///
    /// Returns the first structural error encountered.
    pub fn load(
        document: &WorkflowDocument,
        registry: &NodeTypeRegistry,
    ) -> Result<Self, StructuralError> {
        Self::load_with_layout(document, registry, &GridLayout::default())
    }

    /// Like [`WorkflowGraph::load`] with an explicit layout for unplaced nodes.
    ///
    /// # Errors
    ///
    /// Returns the first structural error encountered.
    pub fn load_with_layout(
        document: &WorkflowDocument,
        registry: &NodeTypeRegistry,
        layout: &GridLayout,
    ) -> Result<Self, StructuralError> {
        let mut graph = Self::with_nodes(document, layout)?;
        for wire in &document.connections {
            let connection = graph.fill_ports(registry, wire);
            graph.connect(
                registry,
                &connection.source,
                &connection.source_port,
                &connection.target,
                &connection.target_port,
            )?;
        }
        Ok(graph)
    }

    /// Resolves a wire connection, taking a missing port from the first
    /// port the node type declares.
    fn fill_ports(&self, registry: &NodeTypeRegistry, wire: &ConnectionDocument) -> Connection {
        let type_of = |id: &NodeId| {
            self.node(id.as_str())
                .and_then(|node| registry.find(node.node_type.as_str()))
        };

        let source_port = wire.source_port.clone().unwrap_or_else(|| {
            let Some(node_type) = type_of(&wire.source) else {
                return DEFAULT_OUTPUT.to_string();
            };
            if node_type.is_branching() {
                debug!(source = %wire.source, "connection without a port attaches to the first branch");
            }
            node_type
                .outputs
                .first()
                .map_or_else(|| DEFAULT_OUTPUT.to_string(), |port| port.name.clone())
        });
        let target_port = wire.target_port.clone().unwrap_or_else(|| {
            type_of(&wire.target)
                .and_then(|node_type| node_type.inputs.first())
                .map_or_else(|| DEFAULT_INPUT.to_string(), |port| port.name.clone())
        });

        Connection::new(wire.source.clone(), source_port, wire.target.clone(), target_port)
    }

    fn with_nodes(document: &WorkflowDocument, layout: &GridLayout) -> Result<Self, StructuralError> {
        let mut graph = Self::new();
        for (index, node) in document.nodes.iter().enumerate() {
            graph.insert_node(node.to_node(index, layout))?;
        }
        graph.variables = document.variables.clone();
        Ok(graph)
    }
}

impl From<WorkflowGraph> for WorkflowDocument {
    fn from(graph: WorkflowGraph) -> Self {
        graph.to_document()
    }
}

impl TryFrom<WorkflowDocument> for WorkflowGraph {
    type Error = StructuralError;

    fn try_from(document: WorkflowDocument) -> Result<Self, Self::Error> {
        Self::from_document(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> NodeTypeRegistry {
        NodeTypeRegistry::with_builtins()
    }

    fn place(graph: &mut WorkflowGraph, registry: &NodeTypeRegistry, node_type: &str, id: &str) -> NodeId {
        let node_type = registry.get(node_type).expect("builtin type");
        graph
            .add_node(node_type, Some(NodeId::new(id)), Position::default())
            .expect("add node")
    }

    fn config(value: serde_json::Value) -> NodeConfig {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn add_and_get_node() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let id = place(&mut graph, &registry, "manual_trigger", "start");

        let node = graph.node(id.as_str()).expect("node exists");
        assert_eq!(node.node_type, "manual_trigger");
        assert!(node.config.is_empty());
    }

    #[test]
    fn add_node_rejects_duplicate_id() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        place(&mut graph, &registry, "manual_trigger", "start");

        let wait = registry.get("wait").expect("wait");
        let result = graph.add_node(wait, Some(NodeId::new("start")), Position::default());
        assert_eq!(
            result,
            Err(StructuralError::DuplicateId {
                node_id: NodeId::new("start")
            })
        );
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn generated_ids_are_unique() {
        let registry = registry();
        let wait = registry.get("wait").expect("wait");
        let mut graph = WorkflowGraph::new();
        let first = graph.add_node(wait, None, Position::default()).expect("first");
        let second = graph.add_node(wait, None, Position::default()).expect("second");

        assert_ne!(first, second);
        assert!(first.as_str().starts_with("wait_"));
    }

    #[test]
    fn connect_rejects_self_connection() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let merge = place(&mut graph, &registry, "merge", "m");

        let result = graph.connect(&registry, &merge, "output", &merge, "input");
        assert!(matches!(result, Err(StructuralError::SelfConnection { .. })));
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn connect_rejects_missing_node() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let start = place(&mut graph, &registry, "manual_trigger", "start");

        let result = graph.connect(&registry, &start, "output", &NodeId::new("ghost"), "input");
        assert_eq!(
            result,
            Err(StructuralError::DanglingReference {
                node_id: NodeId::new("ghost")
            })
        );
    }

    #[test]
    fn connect_rejects_undeclared_port() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let start = place(&mut graph, &registry, "manual_trigger", "start");
        let branch = place(&mut graph, &registry, "if_condition", "if");
        let wait = place(&mut graph, &registry, "wait", "wait");

        graph
            .connect(&registry, &start, "output", &branch, "input")
            .expect("connect trigger");
        let result = graph.connect(&registry, &branch, "output", &wait, "input");
        assert!(matches!(result, Err(StructuralError::UnknownPort { port_name, .. }) if port_name == "output"));
        graph
            .connect(&registry, &branch, "true", &wait, "input")
            .expect("branch output");
    }

    #[test]
    fn second_connection_into_single_input_fails() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let start = place(&mut graph, &registry, "manual_trigger", "start");
        let other = place(&mut graph, &registry, "webhook_trigger", "hook");
        let writer = place(&mut graph, &registry, "write_file", "writer");

        graph
            .connect(&registry, &start, "output", &writer, "input")
            .expect("first connection");
        let result = graph.connect(&registry, &other, "output", &writer, "input");

        assert_eq!(
            result,
            Err(StructuralError::SingleInputViolation {
                node_id: writer.clone(),
                port_name: "input".to_string()
            })
        );
        assert_eq!(graph.connections(), &[Connection::new("start", "output", "writer", "input")]);
    }

    #[test]
    fn multi_input_port_accepts_several_connections() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let start = place(&mut graph, &registry, "manual_trigger", "start");
        let other = place(&mut graph, &registry, "cron_trigger", "cron");
        let merge = place(&mut graph, &registry, "merge", "merge");

        graph.connect(&registry, &start, "output", &merge, "input").expect("first");
        graph.connect(&registry, &other, "output", &merge, "input").expect("second");
        assert_eq!(graph.incoming("merge").count(), 2);
    }

    #[test]
    fn disconnect_removes_one_match() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let start = place(&mut graph, &registry, "manual_trigger", "start");
        let merge = place(&mut graph, &registry, "merge", "merge");
        graph.connect(&registry, &start, "output", &merge, "input").expect("first");
        graph.connect(&registry, &start, "output", &merge, "input").expect("second");

        assert!(graph.disconnect("start", "output", "merge", "input").is_some());
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.disconnect("start", "output", "nobody", "input").is_none());
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn remove_node_cascades_connections() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let start = place(&mut graph, &registry, "manual_trigger", "start");
        let http = place(&mut graph, &registry, "http_request", "http");
        let wait = place(&mut graph, &registry, "wait", "wait");
        graph.connect(&registry, &start, "output", &http, "input").expect("connect");
        graph.connect(&registry, &http, "output", &wait, "input").expect("connect");

        let removed = graph.remove_node("http").expect("node removed");
        assert_eq!(removed.node.id, http);
        assert_eq!(removed.connections.len(), 2);
        assert_eq!(graph.connection_count(), 0);
        assert!(!graph.contains("http"));
        // index still resolves nodes declared after the removed one
        assert_eq!(graph.node("wait").map(|node| &node.id), Some(&wait));
        assert!(graph.remove_node("http").is_none());
    }

    #[test]
    fn configure_replaces_wholesale() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        place(&mut graph, &registry, "http_request", "http");
        graph
            .configure("http", config(json!({ "url": "http://a", "method": "POST" })))
            .expect("configure");

        let previous = graph
            .configure("http", config(json!({ "url": "http://b" })))
            .expect("configure");
        assert_eq!(previous.get("method"), Some(&json!("POST")));
        let node = graph.node("http").expect("node");
        assert_eq!(node.config, config(json!({ "url": "http://b" })));
    }

    #[test]
    fn configure_missing_node_fails() {
        let mut graph = WorkflowGraph::new();
        let result = graph.configure("ghost", NodeConfig::new());
        assert!(matches!(result, Err(StructuralError::NodeNotFound { .. })));
    }

    #[test]
    fn document_roundtrip() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let start = place(&mut graph, &registry, "manual_trigger", "start");
        let branch = place(&mut graph, &registry, "if_condition", "if");
        let wait = place(&mut graph, &registry, "wait", "wait");
        graph.connect(&registry, &start, "output", &branch, "input").expect("connect");
        graph.connect(&registry, &branch, "false", &wait, "input").expect("connect");
        graph
            .configure("if", config(json!({ "condition": "x > 1" })))
            .expect("configure");
        graph.set_variables(config(json!({ "region": "eu" })));

        let json = serde_json::to_string(&graph).expect("serialize");
        let parsed: WorkflowGraph = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(parsed, graph);
        assert_eq!(parsed.connections()[1].source_port, "false");
    }

    #[test]
    fn missing_positions_use_grid() {
        let document: WorkflowDocument = serde_json::from_value(json!({
            "nodes": [
                { "id": "a", "type": "manual_trigger" },
                { "id": "b", "type": "wait", "position": { "x": 5.0, "y": 6.0 } },
                { "id": "c", "type": "wait" },
                { "id": "d", "type": "wait" }
            ]
        }))
        .expect("document");
        let graph = WorkflowGraph::from_document(&document).expect("graph");

        let position = |id: &str| graph.node(id).map(|node| node.position);
        assert_eq!(position("a"), Some(Position::new(100.0, 100.0)));
        assert_eq!(position("b"), Some(Position::new(5.0, 6.0)));
        assert_eq!(position("c"), Some(Position::new(600.0, 100.0)));
        assert_eq!(position("d"), Some(Position::new(100.0, 250.0)));
    }

    #[test]
    fn from_document_rejects_dangling_connection() {
        let document: WorkflowDocument = serde_json::from_value(json!({
            "nodes": [{ "id": "a", "type": "manual_trigger" }],
            "connections": [{ "source": "a", "target": "ghost" }]
        }))
        .expect("document");
        assert_eq!(
            WorkflowGraph::from_document(&document),
            Err(StructuralError::DanglingReference {
                node_id: NodeId::new("ghost")
            })
        );
    }

    #[test]
    fn load_enforces_cardinality() {
        let document: WorkflowDocument = serde_json::from_value(json!({
            "nodes": [
                { "id": "a", "type": "manual_trigger" },
                { "id": "b", "type": "manual_trigger" },
                { "id": "w", "type": "write_file" }
            ],
            "connections": [
                { "source": "a", "target": "w" },
                { "source": "b", "target": "w" }
            ]
        }))
        .expect("document");

        assert!(WorkflowGraph::from_document(&document).is_ok());
        assert!(matches!(
            WorkflowGraph::load(&document, &registry()),
            Err(StructuralError::SingleInputViolation { .. })
        ));
    }

    #[test]
    fn load_fills_missing_ports_from_node_type() {
        let document: WorkflowDocument = serde_json::from_value(json!({
            "nodes": [
                { "id": "start", "type": "manual_trigger" },
                { "id": "if", "type": "if_condition" },
                { "id": "w", "type": "wait" }
            ],
            "connections": [
                { "source": "start", "target": "if" },
                { "source": "if", "target": "w" }
            ]
        }))
        .expect("document");

        let graph = WorkflowGraph::load(&document, &registry()).expect("port-less branch loads");
        let ports: Vec<(&str, &str)> = graph
            .connections()
            .iter()
            .map(|connection| (connection.source_port.as_str(), connection.target_port.as_str()))
            .collect();
        assert_eq!(ports, vec![("output", "input"), ("true", "input")]);
    }

    #[test]
    fn load_keeps_explicit_branch_port() {
        let document: WorkflowDocument = serde_json::from_value(json!({
            "nodes": [
                { "id": "start", "type": "manual_trigger" },
                { "id": "if", "type": "if_condition" },
                { "id": "w", "type": "wait" }
            ],
            "connections": [
                { "source": "start", "target": "if" },
                { "source": "if", "sourcePort": "false", "target": "w" }
            ]
        }))
        .expect("document");

        let graph = WorkflowGraph::load(&document, &registry()).expect("load");
        assert_eq!(graph.connections()[1].source_port, "false");
    }

    #[test]
    fn petgraph_snapshot_mirrors_graph() {
        let registry = registry();
        let mut graph = WorkflowGraph::new();
        let start = place(&mut graph, &registry, "manual_trigger", "start");
        let wait = place(&mut graph, &registry, "wait", "wait");
        graph.connect(&registry, &start, "output", &wait, "input").expect("connect");

        let snapshot = graph.to_petgraph();
        assert_eq!(snapshot.node_count(), 2);
        assert_eq!(snapshot.edge_count(), 1);
        assert_eq!(snapshot[NodeIndex::new(0)], start);
    }
}
