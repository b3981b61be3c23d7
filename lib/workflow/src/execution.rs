//! Envelopes exchanged with the execution service.
//!
//! Nodes are executed elsewhere. This module only builds the request for a
//! validated plan and reads back the per-node results, where one node
//! failing never hides the results of its siblings.

use crate::document::{ConnectionDocument, NodeDocument, WorkflowDocument};
use crate::graph::WorkflowGraph;
use crate::node::NodeConfig;
use crate::planner::ExecutionPlan;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use swarm_core::{NodeId, NodeTypeId};

/// A workflow document restricted to the nodes and connections of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    #[serde(flatten)]
    pub document: WorkflowDocument,
}

impl ExecutionRequest {
    /// Builds the request for `plan`, listing nodes in plan order.
    #[must_use]
    pub fn from_plan(graph: &WorkflowGraph, plan: &ExecutionPlan) -> Self {
        let nodes = plan
            .order
            .iter()
            .filter_map(|id| graph.node(id.as_str()))
            .map(NodeDocument::from)
            .collect();
        let connections = plan.connections.iter().map(ConnectionDocument::from).collect();

        Self {
            document: WorkflowDocument {
                nodes,
                connections,
                variables: NodeConfig::new(),
            },
        }
    }
}

/// Execution status of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl NodeStatus {
    /// Returns true if the node will not change status anymore.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// The outcome of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeTypeId,
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

/// An error reported by the execution service, optionally tied to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    pub message: String,
}

/// Log timestamps arrive either as epoch seconds or as formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogTimestamp {
    Seconds(f64),
    Text(String),
}

/// One debug log line captured during execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub timestamp: LogTimestamp,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    pub message: String,
}

/// Results of an execution, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResults {
    #[serde(default)]
    pub execution_time: f64,
    #[serde(default)]
    pub node_statuses: BTreeMap<NodeId, NodeStatus>,
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, NodeResult>,
    #[serde(default)]
    pub errors: Vec<ReportedError>,
    #[serde(default)]
    pub debug_logs: Vec<DebugLogEntry>,
}

/// The execution service's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ExecutionResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

/// Status counts over an execution response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    pub pending: usize,
    pub running: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Nodes that ended in error, in id order.
    pub failed_nodes: Vec<NodeId>,
}

impl ExecutionSummary {
    /// Total number of nodes counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pending + self.running + self.succeeded + self.failed
    }
}

impl ExecutionResponse {
    /// Returns the status of a node.
    ///
    /// `node_statuses` is authoritative; a node only listed under `nodes`
    /// falls back to its result's status.
    #[must_use]
    pub fn status_of(&self, node_id: &str) -> Option<NodeStatus> {
        let results = self.results.as_ref()?;
        results
            .node_statuses
            .get(node_id)
            .copied()
            .or_else(|| results.nodes.get(node_id).map(|result| result.status))
    }

    /// Counts node statuses across the response.
    #[must_use]
    pub fn summary(&self) -> ExecutionSummary {
        let mut summary = ExecutionSummary::default();
        let Some(results) = &self.results else {
            return summary;
        };

        let mut statuses: BTreeMap<&NodeId, NodeStatus> = results
            .nodes
            .iter()
            .map(|(id, result)| (id, result.status))
            .collect();
        statuses.extend(results.node_statuses.iter().map(|(id, status)| (id, *status)));

        for (id, status) in statuses {
            match status {
                NodeStatus::Pending => summary.pending += 1,
                NodeStatus::Running => summary.running += 1,
                NodeStatus::Success => summary.succeeded += 1,
                NodeStatus::Error => {
                    summary.failed += 1;
                    summary.failed_nodes.push(id.clone());
                }
            }
        }
        summary
    }
}
