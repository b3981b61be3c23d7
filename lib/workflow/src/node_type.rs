//! Node type descriptors.
//!
//! A `NodeType` describes what a node can be: its display metadata, its
//! ports and its config schema. Graph and validator logic asks the
//! descriptor for capabilities (start role, single-input ports, branch
//! outputs) instead of comparing type names.

use crate::port::{BRANCH_FALSE, BRANCH_TRUE, DEFAULT_INPUT, DEFAULT_OUTPUT, InputPort, OutputPort};
use crate::schema::ConfigSchema;
use serde::{Deserialize, Serialize};
use swarm_core::NodeTypeId;

/// Color used when a descriptor does not specify one.
pub const DEFAULT_COLOR: &str = "#5072A7";
/// Icon used when a descriptor does not specify one.
pub const DEFAULT_ICON: &str = "fa-cog";

/// Descriptor of an available node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeType {
    /// Registry key of this type.
    pub id: NodeTypeId,
    /// Human-readable name.
    pub name: String,
    /// What the node does.
    pub description: String,
    /// Palette color.
    pub color: String,
    /// Palette icon.
    pub icon: String,
    /// Input ports, in display order.
    pub inputs: Vec<InputPort>,
    /// Output ports, in display order.
    pub outputs: Vec<OutputPort>,
    /// Config fields, in declaration order.
    pub config_schema: ConfigSchema,
}

impl NodeType {
    /// Creates a node type with the default shape: one required `input`, one `output`.
    #[must_use]
    pub fn new(id: impl Into<NodeTypeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            color: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
            inputs: Self::default_inputs(),
            outputs: Self::default_outputs(),
            config_schema: ConfigSchema::new(),
        }
    }

    /// Creates a start-role node type: no inputs, one `output`.
    #[must_use]
    pub fn trigger(id: impl Into<NodeTypeId>, name: impl Into<String>) -> Self {
        Self {
            inputs: Vec::new(),
            ..Self::new(id, name)
        }
    }

    /// The input ports a type gets when nothing else is declared.
    #[must_use]
    pub fn default_inputs() -> Vec<InputPort> {
        vec![InputPort::required(DEFAULT_INPUT)]
    }

    /// The output ports a type gets when nothing else is declared.
    #[must_use]
    pub fn default_outputs() -> Vec<OutputPort> {
        vec![OutputPort::new(DEFAULT_OUTPUT)]
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the palette color and icon.
    #[must_use]
    pub fn with_appearance(mut self, color: impl Into<String>, icon: impl Into<String>) -> Self {
        self.color = color.into();
        self.icon = icon.into();
        self
    }

    /// Replaces the input ports.
    #[must_use]
    pub fn with_inputs(mut self, inputs: Vec<InputPort>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Replaces the output ports.
    #[must_use]
    pub fn with_outputs(mut self, outputs: Vec<OutputPort>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Limits every input port to one incoming connection.
    #[must_use]
    pub fn single_input(mut self) -> Self {
        for port in &mut self.inputs {
            port.single = true;
        }
        self
    }

    /// Replaces the outputs with the `true`/`false` branch pair.
    #[must_use]
    pub fn branching(self) -> Self {
        self.with_outputs(vec![OutputPort::new(BRANCH_TRUE), OutputPort::new(BRANCH_FALSE)])
    }

    /// Sets the config schema.
    #[must_use]
    pub fn with_schema(mut self, config_schema: ConfigSchema) -> Self {
        self.config_schema = config_schema;
        self
    }

    /// Returns true if this type can start a workflow (no required inputs).
    #[must_use]
    pub fn is_start_role(&self) -> bool {
        !self.inputs.iter().any(|port| port.required)
    }

    /// Returns the required input ports.
    pub fn required_inputs(&self) -> impl Iterator<Item = &InputPort> {
        self.inputs.iter().filter(|port| port.required)
    }

    /// Returns the input port with the given name, if any.
    #[must_use]
    pub fn input_port(&self, name: &str) -> Option<&InputPort> {
        self.inputs.iter().find(|port| port.name == name)
    }

    /// Returns the output port with the given name, if any.
    #[must_use]
    pub fn output_port(&self, name: &str) -> Option<&OutputPort> {
        self.outputs.iter().find(|port| port.name == name)
    }

    /// Returns true if the named input accepts at most one connection.
    #[must_use]
    pub fn is_single_input(&self, port_name: &str) -> bool {
        self.input_port(port_name).is_some_and(|port| port.single)
    }

    /// Returns true if the type routes to one of several named outputs.
    #[must_use]
    pub fn is_branching(&self) -> bool {
        self.outputs.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_has_no_inputs_and_is_start_role() {
        let node_type = NodeType::trigger("manual_trigger", "Manual Trigger");
        assert!(node_type.inputs.is_empty());
        assert_eq!(node_type.outputs.len(), 1);
        assert!(node_type.is_start_role());
    }

    #[test]
    fn default_type_needs_input() {
        let node_type = NodeType::new("http_request", "HTTP Request");
        assert!(!node_type.is_start_role());
        assert_eq!(node_type.required_inputs().count(), 1);
        assert!(!node_type.is_single_input("input"));
    }

    #[test]
    fn optional_inputs_keep_start_role() {
        let node_type = NodeType::new("listener", "Listener")
            .with_inputs(vec![InputPort::optional("input")]);
        assert!(node_type.is_start_role());
    }

    #[test]
    fn single_input_marks_ports() {
        let node_type = NodeType::new("write_file", "Write File").single_input();
        assert!(node_type.is_single_input("input"));
        assert!(!node_type.is_single_input("missing"));
    }

    #[test]
    fn branching_type_has_true_and_false_outputs() {
        let node_type = NodeType::new("if_condition", "If Condition").branching();
        assert!(node_type.is_branching());
        assert!(node_type.output_port("true").is_some());
        assert!(node_type.output_port("false").is_some());
        assert!(node_type.output_port("output").is_none());
    }
}
