//! External node type catalogs.
//!
//! The type-catalog service returns node types as `CatalogEntry` records,
//! either as a bare array or wrapped in a `{ success, node_types, error }`
//! envelope. Entries are merged over the built-in descriptors by
//! `NodeTypeRegistry::bootstrap`.

use crate::error::CatalogError;
use crate::node_type::{DEFAULT_COLOR, DEFAULT_ICON, NodeType};
use crate::port::{InputPort, OutputPort};
use crate::schema::ConfigSchema;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use swarm_core::NodeTypeId;

/// One node type as published by the type-catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub node_type: NodeTypeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub config_schema: ConfigSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<InputPort>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<OutputPort>>,
}

impl CatalogEntry {
    /// Builds a descriptor from this entry.
    ///
    /// Ports come from the entry when it declares them, then from `replaced`
    /// (the descriptor this entry overrides), then the default shape.
    #[must_use]
    pub fn into_node_type(self, replaced: Option<&NodeType>) -> NodeType {
        let inputs = self
            .inputs
            .or_else(|| replaced.map(|existing| existing.inputs.clone()))
            .unwrap_or_else(NodeType::default_inputs);
        let outputs = self
            .outputs
            .or_else(|| replaced.map(|existing| existing.outputs.clone()))
            .unwrap_or_else(NodeType::default_outputs);

        NodeType::new(self.node_type, self.name)
            .with_description(self.description)
            .with_appearance(
                self.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                self.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            )
            .with_inputs(inputs)
            .with_outputs(outputs)
            .with_schema(self.config_schema)
    }
}

/// Wire shape of the catalog service response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Envelope {
        success: bool,
        #[serde(default)]
        node_types: Vec<CatalogEntry>,
        #[serde(default)]
        error: Option<String>,
    },
    Entries(Vec<CatalogEntry>),
}

/// Somewhere node type descriptors can be fetched from.
pub trait CatalogSource {
    /// Fetches the catalog entries.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the catalog cannot be read, is malformed,
    /// or was rejected by the service.
    fn fetch(&self) -> Result<Vec<CatalogEntry>, Report<CatalogError>>;
}

/// A catalog held as JSON text, as read from a file or an HTTP body.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    text: String,
}

impl JsonCatalog {
    /// Creates a catalog over JSON text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl CatalogSource for JsonCatalog {
    fn fetch(&self) -> Result<Vec<CatalogEntry>, Report<CatalogError>> {
        let payload: CatalogPayload =
            serde_json::from_str(&self.text).map_err(|e| CatalogError::Malformed {
                details: e.to_string(),
            })?;

        match payload {
            CatalogPayload::Entries(entries) => Ok(entries),
            CatalogPayload::Envelope {
                success: true,
                node_types,
                ..
            } => Ok(node_types),
            CatalogPayload::Envelope { error, .. } => Err(CatalogError::Rejected {
                details: error.unwrap_or_else(|| "no reason given".to_string()),
            }
            .into()),
        }
    }
}

/// A fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

impl CatalogSource for StaticCatalog {
    fn fetch(&self) -> Result<Vec<CatalogEntry>, Report<CatalogError>> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_is_accepted() {
        let catalog = JsonCatalog::new(
            r#"[{ "type": "slack_post", "name": "Slack Post", "description": "Post a message" }]"#,
        );
        let entries = catalog.fetch().expect("fetch");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].node_type, "slack_post");
        assert!(entries[0].config_schema.is_empty());
    }

    #[test]
    fn envelope_is_unwrapped() {
        let catalog = JsonCatalog::new(
            r#"{
                "success": true,
                "node_types": [{
                    "type": "http_request",
                    "name": "HTTP",
                    "description": "",
                    "config_schema": { "url": { "type": "string", "required": true } }
                }]
            }"#,
        );
        let entries = catalog.fetch().expect("fetch");
        assert_eq!(entries[0].config_schema.len(), 1);
    }

    #[test]
    fn failed_envelope_is_rejected() {
        let catalog = JsonCatalog::new(r#"{ "success": false, "error": "catalog offline" }"#);
        let report = catalog.fetch().expect_err("should be rejected");
        assert!(matches!(
            report.current_context(),
            CatalogError::Rejected { details } if details == "catalog offline"
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let catalog = JsonCatalog::new("not json");
        let report = catalog.fetch().expect_err("should fail");
        assert!(matches!(report.current_context(), CatalogError::Malformed { .. }));
    }

    #[test]
    fn entry_defaults_appearance_and_shape() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{ "type": "custom", "name": "Custom" }"#).expect("deserialize");
        let node_type = entry.into_node_type(None);
        assert_eq!(node_type.color, DEFAULT_COLOR);
        assert_eq!(node_type.icon, DEFAULT_ICON);
        assert_eq!(node_type.inputs, NodeType::default_inputs());
        assert_eq!(node_type.outputs, NodeType::default_outputs());
    }

    #[test]
    fn entry_keeps_ports_of_replaced_type() {
        let builtin = NodeType::trigger("manual_trigger", "Manual Trigger");
        let entry: CatalogEntry =
            serde_json::from_str(r#"{ "type": "manual_trigger", "name": "Run" }"#).expect("deserialize");
        let node_type = entry.into_node_type(Some(&builtin));
        assert!(node_type.inputs.is_empty());
        assert_eq!(node_type.name, "Run");
    }
}
