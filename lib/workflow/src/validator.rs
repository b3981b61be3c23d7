//! Graph validation.
//!
//! Validation runs as a short-circuiting pipeline:
//!
//! 1. at least one start-role node exists (`NoTrigger`)
//! 2. at least one start-role node has an outgoing connection (`TriggerNotConnected`)
//! 3. the execution order is planned from every start-role node
//! 4. nodes outside the plan are flagged `NotConnected` (warning only)
//! 5. every planned non-start node's config passes its schema (`NodeFieldError`)
//! 6. every planned node that takes a required input has an incoming connection (`MissingInput`)
//!
//! Fatal outcomes are returned as data next to the warnings gathered so far;
//! nothing here panics or aborts the caller.

use crate::config_validator::{scan_node, validate_node};
use crate::error::{FieldError, ValidationError};
use crate::graph::WorkflowGraph;
use crate::node::WorkflowNode;
use crate::planner::{ExecutionOrderPlanner, ExecutionPlan};
use crate::registry::NodeTypeRegistry;
use crate::template::context_references;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use swarm_core::NodeId;
use tracing::{debug, info, instrument, warn};

fn default_check_templates() -> bool {
    true
}

/// Tunables for graph validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Warn about `{{context.<node>.<key>}}` references to nodes that run later or never.
    #[serde(default = "default_check_templates")]
    pub check_templates: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            check_templates: default_check_templates(),
        }
    }
}

/// Non-fatal findings. They never block a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// The node is unreachable from every start node and is left out of the plan.
    NotConnected { node_id: NodeId },
    /// The traversal cut a cycle through these nodes.
    CycleBroken { nodes: Vec<NodeId> },
    /// A config value references a node that is not scheduled before this one.
    UnresolvedReference {
        node_id: NodeId,
        field_key: String,
        reference: String,
    },
}

/// The result of validating a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphValidation {
    /// The plan, or the first fatal error.
    pub outcome: Result<ExecutionPlan, ValidationError>,
    /// Warnings gathered up to the point the pipeline stopped.
    pub warnings: Vec<ValidationWarning>,
}

impl GraphValidation {
    /// Returns true if validation produced a plan.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns the plan, if validation succeeded.
    #[must_use]
    pub fn plan(&self) -> Option<&ExecutionPlan> {
        self.outcome.as_ref().ok()
    }

    /// Returns the fatal error, if validation failed.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        self.outcome.as_ref().err()
    }

    /// Returns true if the node was flagged as unreachable.
    #[must_use]
    pub fn is_flagged_not_connected(&self, node_id: &str) -> bool {
        self.warnings.iter().any(|warning| {
            matches!(warning, ValidationWarning::NotConnected { node_id: id } if id == node_id)
        })
    }
}

impl Serialize for GraphValidation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            valid: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            plan: Option<&'a ExecutionPlan>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<&'a ValidationError>,
            warnings: &'a [ValidationWarning],
        }

        Wire {
            valid: self.is_valid(),
            plan: self.plan(),
            error: self.error(),
            warnings: &self.warnings,
        }
        .serialize(serializer)
    }
}

/// Validates workflow graphs against a node type registry.
#[derive(Debug, Clone)]
pub struct GraphValidator<'r> {
    registry: &'r NodeTypeRegistry,
    options: ValidatorOptions,
}

impl<'r> GraphValidator<'r> {
    #[must_use]
    pub fn new(registry: &'r NodeTypeRegistry) -> Self {
        Self::with_options(registry, ValidatorOptions::default())
    }

    #[must_use]
    pub fn with_options(registry: &'r NodeTypeRegistry, options: ValidatorOptions) -> Self {
        Self { registry, options }
    }

    /// Runs the validation pipeline.
    #[instrument(skip_all, fields(nodes = graph.node_count(), connections = graph.connection_count()))]
    pub fn validate(&self, graph: &WorkflowGraph) -> GraphValidation {
        let planner = ExecutionOrderPlanner::new(self.registry);

        let starts = planner.start_nodes(graph);
        if starts.is_empty() {
            warn!("workflow has no trigger node");
            return GraphValidation {
                outcome: Err(ValidationError::NoTrigger),
                warnings: Vec::new(),
            };
        }

        let plan = planner.plan_from(graph, &starts);
        let mut warnings = reachability_warnings(graph, &plan);

        let any_connected = starts
            .iter()
            .any(|start| graph.outgoing(start.as_str()).next().is_some());
        if !any_connected {
            warn!(triggers = starts.len(), "no trigger node is connected");
            return GraphValidation {
                outcome: Err(ValidationError::TriggerNotConnected { nodes: starts }),
                warnings,
            };
        }

        if let Err(error) = self.check_planned_nodes(graph, &plan) {
            warn!(%error, "workflow failed validation");
            return GraphValidation {
                outcome: Err(error),
                warnings,
            };
        }

        if self.options.check_templates {
            warnings.extend(reference_warnings(graph, &plan));
        }

        info!(
            scheduled = plan.order.len(),
            warnings = warnings.len(),
            "workflow validated"
        );
        GraphValidation {
            outcome: Ok(plan),
            warnings,
        }
    }

    /// Reports every config field error of every planned non-start node.
    ///
    /// Nodes without errors, or with unregistered types, are left out.
    #[must_use]
    pub fn scan(&self, graph: &WorkflowGraph) -> BTreeMap<NodeId, Vec<FieldError>> {
        let plan = ExecutionOrderPlanner::new(self.registry).plan(graph);
        planned_nodes(graph, &plan)
            .filter_map(|node| {
                let node_type = self.registry.find(node.node_type.as_str())?;
                if node_type.is_start_role() {
                    return None;
                }
                let errors = scan_node(node, node_type);
                (!errors.is_empty()).then(|| (node.id.clone(), errors))
            })
            .collect()
    }

    /// Field validation (step 5) then input dependencies (step 6), both over
    /// planned nodes in plan order.
    fn check_planned_nodes(
        &self,
        graph: &WorkflowGraph,
        plan: &ExecutionPlan,
    ) -> Result<(), ValidationError> {
        for node in planned_nodes(graph, plan) {
            let node_type = self.registry.find(node.node_type.as_str()).ok_or_else(|| {
                ValidationError::UnknownNodeType {
                    node_id: node.id.clone(),
                    node_type: node.node_type.clone(),
                }
            })?;
            if node_type.is_start_role() {
                continue;
            }
            validate_node(node, node_type)
                .map_err(|error| ValidationError::from_field_error(node.id.clone(), error))?;
        }

        for node in planned_nodes(graph, plan) {
            let Some(node_type) = self.registry.find(node.node_type.as_str()) else {
                continue;
            };
            let needs_input = node_type.required_inputs().next().is_some();
            if needs_input && graph.incoming(node.id.as_str()).next().is_none() {
                return Err(ValidationError::MissingInput {
                    node_id: node.id.clone(),
                });
            }
        }
        Ok(())
    }
}

fn planned_nodes<'g>(
    graph: &'g WorkflowGraph,
    plan: &'g ExecutionPlan,
) -> impl Iterator<Item = &'g WorkflowNode> + 'g {
    plan.order.iter().filter_map(|id| graph.node(id.as_str()))
}

fn reachability_warnings(graph: &WorkflowGraph, plan: &ExecutionPlan) -> Vec<ValidationWarning> {
    let mut warnings: Vec<ValidationWarning> = graph
        .nodes()
        .filter(|node| !plan.contains(node.id.as_str()))
        .map(|node| {
            debug!(node_id = %node.id, "node is not connected to any trigger");
            ValidationWarning::NotConnected {
                node_id: node.id.clone(),
            }
        })
        .collect();
    warnings.extend(
        plan.cycles
            .iter()
            .map(|nodes| ValidationWarning::CycleBroken { nodes: nodes.clone() }),
    );
    warnings
}

fn reference_warnings(graph: &WorkflowGraph, plan: &ExecutionPlan) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    for (position, node) in planned_nodes(graph, plan).enumerate() {
        for (field_key, value) in &node.config {
            for text in strings_in(value) {
                for reference in context_references(text) {
                    let resolved = plan
                        .position(reference.node_id)
                        .is_some_and(|producer| producer < position);
                    if !resolved {
                        warnings.push(ValidationWarning::UnresolvedReference {
                            node_id: node.id.clone(),
                            field_key: field_key.clone(),
                            reference: reference.raw.to_string(),
                        });
                    }
                }
            }
        }
    }
    warnings
}

/// Every string nested anywhere inside `value`.
fn strings_in(value: &JsonValue) -> Vec<&str> {
    match value {
        JsonValue::String(text) => vec![text.as_str()],
        JsonValue::Array(items) => items.iter().flat_map(strings_in).collect(),
        JsonValue::Object(map) => map.values().flat_map(strings_in).collect(),
        _ => Vec::new(),
    }
}
