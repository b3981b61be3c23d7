//! Error types for the workflow crate.
//!
//! Two taxonomies are kept apart:
//! - `StructuralError`: raised synchronously by `WorkflowGraph` mutators and
//!   document loading. The offending mutation is rejected in full.
//! - `ValidationError`: produced by the `GraphValidator` as data. It never
//!   aborts the caller, and always names the node (and field) at fault.
//!
//! Registry and catalog failures get their own small enums; catalog loading
//! wraps them in a rootcause `Report` so callers can layer context on top.

use serde::Serialize;
use swarm_core::{NodeId, NodeTypeId};
use std::fmt;

/// Errors from graph mutations and document loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A node with this id already exists in the graph.
    DuplicateId { node_id: NodeId },
    /// A connection would link a node to itself.
    SelfConnection { node_id: NodeId },
    /// The target port accepts a single connection and already has one.
    SingleInputViolation { node_id: NodeId, port_name: String },
    /// A connection references a node that is not in the graph.
    DanglingReference { node_id: NodeId },
    /// The node addressed by an operation does not exist.
    NodeNotFound { node_id: NodeId },
    /// The node's type is not known to the registry.
    UnknownNodeType { node_id: NodeId, node_type: NodeTypeId },
    /// The node type does not declare the named port.
    UnknownPort { node_id: NodeId, port_name: String },
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { node_id } => {
                write!(f, "node id '{node_id}' already exists")
            }
            Self::SelfConnection { node_id } => {
                write!(f, "node '{node_id}' cannot be connected to itself")
            }
            Self::SingleInputViolation { node_id, port_name } => {
                write!(
                    f,
                    "port '{port_name}' on node '{node_id}' accepts only one incoming connection"
                )
            }
            Self::DanglingReference { node_id } => {
                write!(f, "connection references unknown node '{node_id}'")
            }
            Self::NodeNotFound { node_id } => write!(f, "node not found: {node_id}"),
            Self::UnknownNodeType { node_id, node_type } => {
                write!(f, "node '{node_id}' has unknown type '{node_type}'")
            }
            Self::UnknownPort { node_id, port_name } => {
                write!(f, "port '{port_name}' is not declared on node '{node_id}'")
            }
        }
    }
}

impl std::error::Error for StructuralError {}

/// Why a single config field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FieldErrorReason {
    /// Required field has no value.
    Missing,
    /// Required non-boolean field holds an empty string.
    Empty,
    /// Number field does not hold a finite number.
    NotANumber,
    /// Structured text could not be parsed.
    MalformedStructure { expected: String, detail: String },
    /// Structured value parsed but has the wrong shape.
    WrongShape { expected: String },
    /// String value is not one of the allowed values.
    NotInEnum { allowed: Vec<String> },
}

impl fmt::Display for FieldErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "is required"),
            Self::Empty => write!(f, "must not be empty"),
            Self::NotANumber => write!(f, "must be a finite number"),
            Self::MalformedStructure { expected, detail } => {
                write!(f, "is not valid {expected} JSON: {detail}")
            }
            Self::WrongShape { expected } => write!(f, "must be a JSON {expected}"),
            Self::NotInEnum { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
        }
    }
}

/// A failed check on one config field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The config key that failed.
    pub field_key: String,
    /// What was wrong with it.
    #[serde(flatten)]
    pub reason: FieldErrorReason,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field_key: impl Into<String>, reason: FieldErrorReason) -> Self {
        Self {
            field_key: field_key.into(),
            reason,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}' {}", self.field_key, self.reason)
    }
}

impl std::error::Error for FieldError {}

/// Fatal outcomes of graph validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// No node can start the workflow.
    NoTrigger,
    /// No start node has an outgoing connection.
    TriggerNotConnected { nodes: Vec<NodeId> },
    /// A reachable node has an invalid config field.
    NodeFieldError {
        node_id: NodeId,
        field_key: String,
        reason: FieldErrorReason,
    },
    /// A reachable node needs input but has no incoming connection.
    MissingInput { node_id: NodeId },
    /// A reachable node's type is not registered.
    UnknownNodeType { node_id: NodeId, node_type: NodeTypeId },
}

impl ValidationError {
    /// Returns the node this error points at, if it points at exactly one.
    #[must_use]
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::NodeFieldError { node_id, .. }
            | Self::MissingInput { node_id, .. }
            | Self::UnknownNodeType { node_id, .. } => Some(node_id),
            Self::NoTrigger | Self::TriggerNotConnected { .. } => None,
        }
    }

    pub(crate) fn from_field_error(node_id: NodeId, error: FieldError) -> Self {
        Self::NodeFieldError {
            node_id,
            field_key: error.field_key,
            reason: error.reason,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTrigger => write!(f, "workflow has no trigger node"),
            Self::TriggerNotConnected { nodes } => {
                let ids: Vec<&str> = nodes.iter().map(NodeId::as_str).collect();
                write!(
                    f,
                    "no trigger node is connected to the workflow (unconnected: {})",
                    ids.join(", ")
                )
            }
            Self::NodeFieldError {
                node_id,
                field_key,
                reason,
            } => write!(f, "node '{node_id}': field '{field_key}' {reason}"),
            Self::MissingInput { node_id } => {
                write!(f, "node '{node_id}' requires an input connection")
            }
            Self::UnknownNodeType { node_id, node_type } => {
                write!(f, "node '{node_id}' has unknown type '{node_type}'")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors from registry lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No descriptor is registered under this id.
    NotFound { node_type: NodeTypeId },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { node_type } => write!(f, "node type not found: {node_type}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors from fetching an external node type catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog payload could not be decoded.
    Malformed { details: String },
    /// The catalog service answered with `success: false`.
    Rejected { details: String },
    /// The catalog could not be reached or read.
    Unavailable { details: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { details } => write!(f, "malformed node type catalog: {details}"),
            Self::Rejected { details } => write!(f, "node type catalog rejected: {details}"),
            Self::Unavailable { details } => {
                write!(f, "node type catalog unavailable: {details}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}
