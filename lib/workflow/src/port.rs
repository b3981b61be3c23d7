//! Port system for workflow nodes.
//!
//! Ports are named connection points on nodes. Most node types expose one
//! input named `input` and one output named `output`; branching types
//! expose several named outputs (`true`/`false`), and start types expose no
//! input at all. An input port may be limited to a single incoming
//! connection.

use serde::{Deserialize, Serialize};

/// Name of the default input port.
pub const DEFAULT_INPUT: &str = "input";
/// Name of the default output port.
pub const DEFAULT_OUTPUT: &str = "output";
/// Output taken when a branching node's condition holds.
pub const BRANCH_TRUE: &str = "true";
/// Output taken when a branching node's condition fails.
pub const BRANCH_FALSE: &str = "false";

fn default_required() -> bool {
    true
}

/// An input port on a node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPort {
    /// The name of this port.
    pub name: String,
    /// Whether this input must have an incoming connection.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Whether this input accepts at most one incoming connection.
    #[serde(default)]
    pub single: bool,
}

impl InputPort {
    /// Creates a new required input port accepting any number of connections.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            single: false,
        }
    }

    /// Creates a new optional input port.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            single: false,
        }
    }

    /// Limits this port to one incoming connection.
    #[must_use]
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }
}

/// An output port on a node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPort {
    /// The name of this port.
    pub name: String,
}

impl OutputPort {
    /// Creates a new output port.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_port_required() {
        let port = InputPort::required("input");
        assert!(port.required);
        assert!(!port.single);
        assert_eq!(port.name, "input");
    }

    #[test]
    fn input_port_single() {
        let port = InputPort::required("input").single();
        assert!(port.required);
        assert!(port.single);
    }

    #[test]
    fn input_port_deserializes_with_defaults() {
        let port: InputPort = serde_json::from_str(r#"{ "name": "data" }"#).expect("deserialize");
        assert!(port.required);
        assert!(!port.single);
    }
}
