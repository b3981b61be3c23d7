//! Execution order planning.
//!
//! The order is a breadth-first traversal from the start-role nodes over
//! connections in insertion order. A node is scheduled where it is first
//! discovered, which is not necessarily after all of its producers, and a
//! cycle is cut by the visited set instead of being rejected. Both branches
//! of a branching node are scheduled; choosing one is left to the execution
//! service.

use crate::connection::Connection;
use crate::graph::WorkflowGraph;
use crate::registry::NodeTypeRegistry;
use petgraph::algo::tarjan_scc;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use swarm_core::NodeId;
use tracing::debug;

/// The static execution plan of a workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionPlan {
    /// Nodes in scheduling order, each exactly once.
    pub order: Vec<NodeId>,
    /// Connections whose ends are both scheduled, in insertion order.
    pub connections: Vec<Connection>,
    /// Cycles among scheduled nodes that the traversal cut, members in plan order.
    pub cycles: Vec<Vec<NodeId>>,
}

impl ExecutionPlan {
    /// Returns true if the node is scheduled.
    #[must_use]
    pub fn contains(&self, node_id: &str) -> bool {
        self.order.iter().any(|id| id == node_id)
    }

    /// Returns the node's position in the order.
    #[must_use]
    pub fn position(&self, node_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == node_id)
    }
}

/// Computes execution plans from node type capabilities.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionOrderPlanner<'r> {
    registry: &'r NodeTypeRegistry,
}

impl<'r> ExecutionOrderPlanner<'r> {
    #[must_use]
    pub fn new(registry: &'r NodeTypeRegistry) -> Self {
        Self { registry }
    }

    /// Returns the start-role nodes in declaration order.
    ///
    /// Nodes whose type is not registered never start a workflow.
    #[must_use]
    pub fn start_nodes(&self, graph: &WorkflowGraph) -> Vec<NodeId> {
        graph
            .nodes()
            .filter(|node| {
                self.registry
                    .find(node.node_type.as_str())
                    .is_some_and(|node_type| node_type.is_start_role())
            })
            .map(|node| node.id.clone())
            .collect()
    }

    /// Plans from every start-role node.
    #[must_use]
    pub fn plan(&self, graph: &WorkflowGraph) -> ExecutionPlan {
        self.plan_from(graph, &self.start_nodes(graph))
    }

    /// Plans from the given roots, in the given order.
    ///
    /// Roots that are not in the graph are ignored.
    #[must_use]
    pub fn plan_from(&self, graph: &WorkflowGraph, roots: &[NodeId]) -> ExecutionPlan {
        let mut adjacency: HashMap<&str, Vec<&Connection>> = HashMap::new();
        for connection in graph.connections() {
            adjacency
                .entry(connection.source.as_str())
                .or_default()
                .push(connection);
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        for root in roots {
            if graph.contains(root.as_str()) && visited.insert(root.as_str()) {
                queue.push_back(root.as_str());
            }
        }

        let mut order = Vec::new();
        while let Some(current) = queue.pop_front() {
            order.push(NodeId::new(current));
            for connection in adjacency.get(current).into_iter().flatten() {
                let target = connection.target.as_str();
                if visited.insert(target) {
                    queue.push_back(target);
                }
            }
        }

        let connections: Vec<Connection> = graph
            .connections()
            .iter()
            .filter(|connection| {
                visited.contains(connection.source.as_str())
                    && visited.contains(connection.target.as_str())
            })
            .cloned()
            .collect();

        let cycles = cut_cycles(graph, &order);
        debug!(
            scheduled = order.len(),
            connections = connections.len(),
            cycles = cycles.len(),
            "planned execution order"
        );

        ExecutionPlan {
            order,
            connections,
            cycles,
        }
    }
}

/// Strongly connected components of more than one node among `order`.
fn cut_cycles(graph: &WorkflowGraph, order: &[NodeId]) -> Vec<Vec<NodeId>> {
    let rank: HashMap<&NodeId, usize> = order.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let snapshot = graph.to_petgraph();

    let mut cycles: Vec<Vec<NodeId>> = tarjan_scc(&snapshot)
        .into_iter()
        .filter(|component| component.len() > 1)
        .filter_map(|component| {
            let mut members: Vec<NodeId> = component
                .into_iter()
                .map(|index| snapshot[index].clone())
                .filter(|id| rank.contains_key(id))
                .collect();
            if members.len() < 2 {
                return None;
            }
            members.sort_by_key(|id| rank.get(id).copied());
            Some(members)
        })
        .collect();
    cycles.sort_by_key(|members| members.first().and_then(|id| rank.get(id).copied()));
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::WorkflowDocument;
    use serde_json::json;

    fn graph(value: serde_json::Value) -> WorkflowGraph {
        let document: WorkflowDocument = serde_json::from_value(value).expect("document");
        WorkflowGraph::from_document(&document).expect("graph")
    }

    fn ids(order: &[NodeId]) -> Vec<&str> {
        order.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn linear_workflow_is_planned_in_order() {
        let registry = NodeTypeRegistry::with_builtins();
        let graph = graph(json!({
            "nodes": [
                { "id": "A", "type": "http_request", "config": { "url": "http://x" } },
                { "id": "start", "type": "manual_trigger" }
            ],
            "connections": [{ "source": "start", "target": "A" }]
        }));

        let plan = ExecutionOrderPlanner::new(&registry).plan(&graph);
        assert_eq!(ids(&plan.order), vec!["start", "A"]);
        assert_eq!(plan.connections.len(), 1);
        assert!(plan.cycles.is_empty());
    }

    #[test]
    fn cycle_is_cut_and_reported() {
        let registry = NodeTypeRegistry::with_builtins();
        let graph = graph(json!({
            "nodes": [
                { "id": "start", "type": "manual_trigger" },
                { "id": "A", "type": "merge" },
                { "id": "B", "type": "merge" }
            ],
            "connections": [
                { "source": "start", "target": "A" },
                { "source": "A", "target": "B" },
                { "source": "B", "target": "A" }
            ]
        }));

        let plan = ExecutionOrderPlanner::new(&registry).plan(&graph);
        assert_eq!(ids(&plan.order), vec!["start", "A", "B"]);
        assert_eq!(plan.connections.len(), 3);
        assert_eq!(plan.cycles.len(), 1);
        assert_eq!(ids(&plan.cycles[0]), vec!["A", "B"]);
    }

    #[test]
    fn planning_is_idempotent() {
        let registry = NodeTypeRegistry::with_builtins();
        let graph = graph(json!({
            "nodes": [
                { "id": "start", "type": "manual_trigger" },
                { "id": "a", "type": "wait" },
                { "id": "b", "type": "wait" },
                { "id": "m", "type": "merge" }
            ],
            "connections": [
                { "source": "start", "target": "b" },
                { "source": "start", "target": "a" },
                { "source": "a", "target": "m" },
                { "source": "b", "target": "m" }
            ]
        }));

        let planner = ExecutionOrderPlanner::new(&registry);
        let first = planner.plan(&graph);
        assert_eq!(first, planner.plan(&graph));
        // fan-out follows connection insertion order
        assert_eq!(ids(&first.order), vec!["start", "b", "a", "m"]);
    }

    #[test]
    fn both_branches_are_scheduled() {
        let registry = NodeTypeRegistry::with_builtins();
        let graph = graph(json!({
            "nodes": [
                { "id": "start", "type": "manual_trigger" },
                { "id": "if", "type": "if_condition" },
                { "id": "yes", "type": "wait" },
                { "id": "no", "type": "wait" }
            ],
            "connections": [
                { "source": "start", "target": "if" },
                { "source": "if", "sourcePort": "true", "target": "yes" },
                { "source": "if", "sourcePort": "false", "target": "no" }
            ]
        }));

        let plan = ExecutionOrderPlanner::new(&registry).plan(&graph);
        assert_eq!(ids(&plan.order), vec!["start", "if", "yes", "no"]);
    }

    #[test]
    fn shorter_path_wins_over_dependencies() {
        // start -> a -> b, start -> b: b is scheduled before a has run
        let registry = NodeTypeRegistry::with_builtins();
        let graph = graph(json!({
            "nodes": [
                { "id": "start", "type": "manual_trigger" },
                { "id": "a", "type": "wait" },
                { "id": "b", "type": "merge" }
            ],
            "connections": [
                { "source": "start", "target": "b" },
                { "source": "start", "target": "a" },
                { "source": "a", "target": "b" }
            ]
        }));

        let plan = ExecutionOrderPlanner::new(&registry).plan(&graph);
        assert_eq!(ids(&plan.order), vec!["start", "b", "a"]);
    }

    #[test]
    fn unreachable_nodes_and_their_connections_are_left_out() {
        let registry = NodeTypeRegistry::with_builtins();
        let graph = graph(json!({
            "nodes": [
                { "id": "start", "type": "manual_trigger" },
                { "id": "a", "type": "wait" },
                { "id": "x", "type": "wait" },
                { "id": "y", "type": "merge" }
            ],
            "connections": [
                { "source": "start", "target": "a" },
                { "source": "x", "target": "y" }
            ]
        }));

        let plan = ExecutionOrderPlanner::new(&registry).plan(&graph);
        assert_eq!(ids(&plan.order), vec!["start", "a"]);
        assert!(!plan.contains("x"));
        assert_eq!(plan.connections, vec![Connection::with_default_ports("start", "a")]);
    }

    #[test]
    fn start_nodes_follow_declaration_order() {
        let registry = NodeTypeRegistry::with_builtins();
        let graph = graph(json!({
            "nodes": [
                { "id": "cron", "type": "cron_trigger" },
                { "id": "w", "type": "wait" },
                { "id": "manual", "type": "manual_trigger" },
                { "id": "mystery", "type": "not_registered" }
            ]
        }));

        let starts = ExecutionOrderPlanner::new(&registry).start_nodes(&graph);
        assert_eq!(ids(&starts), vec!["cron", "manual"]);
    }

    #[test]
    fn plan_from_ignores_unknown_roots() {
        let registry = NodeTypeRegistry::with_builtins();
        let graph = graph(json!({ "nodes": [{ "id": "w", "type": "wait" }] }));

        let plan = ExecutionOrderPlanner::new(&registry)
            .plan_from(&graph, &[NodeId::new("ghost"), NodeId::new("w")]);
        assert_eq!(ids(&plan.order), vec!["w"]);
        assert_eq!(plan.position("w"), Some(0));
    }
}
