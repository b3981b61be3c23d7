//! Subcommand implementations.
//!
//! Each command returns its JSON output; printing and exit codes are left
//! to `main`.

use crate::config::CliConfig;
use crate::error::CliError;
use rootcause::prelude::Report;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};
use swarm_workflow::{
    CatalogEntry, CatalogError, CatalogSource, ExecutionRequest, GraphValidation, GraphValidator,
    JsonCatalog, NodeType, NodeTypeRegistry, WorkflowDocument, WorkflowGraph,
};
use tracing::{debug, info};

/// A node type catalog stored in a JSON file.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalog {
    fn fetch(&self) -> Result<Vec<CatalogEntry>, Report<CatalogError>> {
        let text = fs::read_to_string(&self.path).map_err(|e| CatalogError::Unavailable {
            details: format!("{}: {e}", self.path.display()),
        })?;
        JsonCatalog::new(text).fetch()
    }
}

/// Builds the session registry from the built-ins and the configured catalog.
pub fn load_registry(config: &CliConfig) -> NodeTypeRegistry {
    match &config.catalog_path {
        Some(path) => {
            debug!(path = %path.display(), "loading node type catalog");
            NodeTypeRegistry::bootstrap(&FileCatalog::new(path))
        }
        None => NodeTypeRegistry::with_builtins(),
    }
}

/// Reads a workflow document and loads it against the registry.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or breaks a
/// structural rule.
pub fn load_graph(
    path: &Path,
    registry: &NodeTypeRegistry,
    config: &CliConfig,
) -> Result<WorkflowGraph, Report<CliError>> {
    let text = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    let document: WorkflowDocument =
        serde_json::from_str(&text).map_err(|e| CliError::parse(path, e))?;
    let graph = WorkflowGraph::load_with_layout(&document, registry, &config.layout).map_err(
        |e| CliError::Structure {
            details: e.to_string(),
        },
    )?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        connections = graph.connection_count(),
        "loaded workflow"
    );
    Ok(graph)
}

/// `swarm types`: every registered node type.
///
/// # Errors
///
/// Returns an error if the catalog cannot be serialized.
pub fn types(registry: &NodeTypeRegistry) -> Result<JsonValue, Report<CliError>> {
    let types: Vec<&NodeType> = registry.list().collect();
    to_json(&types)
}

/// `swarm validate <file>`: the validation outcome and warnings.
///
/// # Errors
///
/// Returns an error if the workflow cannot be loaded.
pub fn validate(
    path: &Path,
    registry: &NodeTypeRegistry,
    config: &CliConfig,
) -> Result<GraphValidation, Report<CliError>> {
    let graph = load_graph(path, registry, config)?;
    Ok(GraphValidator::with_options(registry, config.validator.clone()).validate(&graph))
}

/// `swarm plan <file>`: the execution request for a valid workflow.
///
/// # Errors
///
/// Returns an error if the workflow cannot be loaded or fails validation.
pub fn plan(
    path: &Path,
    registry: &NodeTypeRegistry,
    config: &CliConfig,
) -> Result<ExecutionRequest, Report<CliError>> {
    let graph = load_graph(path, registry, config)?;
    let validation =
        GraphValidator::with_options(registry, config.validator.clone()).validate(&graph);
    match validation.outcome {
        Ok(plan) => Ok(ExecutionRequest::from_plan(&graph, &plan)),
        Err(error) => Err(CliError::Invalid {
            details: error.to_string(),
        }
        .into()),
    }
}

/// Serializes command output.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as JSON.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<JsonValue, Report<CliError>> {
    Ok(serde_json::to_value(value).map_err(|e| CliError::Output {
        details: e.to_string(),
    })?)
}
