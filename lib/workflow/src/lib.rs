//! Workflow model, validation and planning for swarm.
//!
//! This crate provides everything needed to turn a user-built workflow
//! into a validated execution plan:
//!
//! - **Node Types**: descriptors with ports and declarative config schemas,
//!   a built-in catalog and a registry that merges an external catalog on top
//! - **Config Validation**: per-field schema rules with `showIf` visibility
//! - **Graph Model**: nodes and ordered port connections with structural invariants
//! - **Planning**: breadth-first execution order from the start-role nodes
//! - **Validation**: trigger, connectivity, field and input checks as data
//! - **Execution Envelopes**: request and response shapes of the execution service
//!
//! Nothing here performs I/O; node execution happens in an external service.

pub mod builtin;
pub mod catalog;
pub mod config_validator;
pub mod connection;
pub mod document;
pub mod error;
pub mod execution;
pub mod graph;
pub mod node;
pub mod node_type;
pub mod planner;
pub mod port;
pub mod registry;
pub mod schema;
pub mod template;
pub mod validator;

pub use catalog::{CatalogEntry, CatalogSource, JsonCatalog, StaticCatalog};
pub use connection::Connection;
pub use document::{ConnectionDocument, GridLayout, NodeDocument, WorkflowDocument};
pub use error::{
    CatalogError, FieldError, FieldErrorReason, RegistryError, StructuralError, ValidationError,
};
pub use execution::{ExecutionRequest, ExecutionResponse, ExecutionSummary, NodeStatus};
pub use graph::{RemovedNode, WorkflowGraph};
pub use node::{NodeConfig, Position, WorkflowNode};
pub use node_type::NodeType;
pub use planner::{ExecutionOrderPlanner, ExecutionPlan};
pub use port::{InputPort, OutputPort};
pub use registry::NodeTypeRegistry;
pub use schema::{ConfigSchema, FieldSpec, FieldType, ShowIf};
pub use validator::{GraphValidation, GraphValidator, ValidationWarning, ValidatorOptions};
