//! Registry of available node types.
//!
//! The registry is populated once at startup (built-ins, then an external
//! catalog merged on top) and only read afterwards.

use crate::builtin::builtin_node_types;
use crate::catalog::{CatalogEntry, CatalogSource};
use crate::error::RegistryError;
use crate::node_type::NodeType;
use std::collections::HashMap;
use swarm_core::NodeTypeId;
use tracing::{debug, info, warn};

/// Node type descriptors keyed by id, listed in registration order.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    types: HashMap<NodeTypeId, NodeType>,
    order: Vec<NodeTypeId>,
}

impl NodeTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in node types.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for node_type in builtin_node_types() {
            registry.register(node_type);
        }
        registry
    }

    /// Builds the session registry: built-ins overlaid with the catalog from `source`.
    ///
    /// A catalog that cannot be fetched leaves the built-ins in place.
    pub fn bootstrap(source: &dyn CatalogSource) -> Self {
        let mut registry = Self::with_builtins();
        match source.fetch() {
            Ok(entries) => {
                let count = entries.len();
                registry.merge_catalog(entries);
                info!(fetched = count, total = registry.len(), "node type catalog merged");
            }
            Err(report) => {
                warn!(error = %report, "node type catalog unavailable, using built-in types");
            }
        }
        registry
    }

    /// Registers a node type, returning the descriptor it replaced.
    ///
    /// A replaced type keeps its position in `list()`.
    pub fn register(&mut self, node_type: NodeType) -> Option<NodeType> {
        let id = node_type.id.clone();
        let replaced = self.types.insert(id.clone(), node_type);
        if replaced.is_none() {
            self.order.push(id);
        }
        replaced
    }

    /// Merges catalog entries over the registered types. Entries win on id collision.
    pub fn merge_catalog(&mut self, entries: impl IntoIterator<Item = CatalogEntry>) {
        for entry in entries {
            let id = entry.node_type.clone();
            let node_type = entry.into_node_type(self.types.get(&id));
            debug!(node_type = %node_type.id, "registering catalog node type");
            self.register(node_type);
        }
    }

    /// Returns the descriptor for `id`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no type is registered under `id`.
    pub fn get(&self, id: &str) -> Result<&NodeType, RegistryError> {
        self.types.get(id).ok_or_else(|| RegistryError::NotFound {
            node_type: NodeTypeId::new(id),
        })
    }

    /// Returns the descriptor for `id`, if registered.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Returns true if a type is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    /// Lists every registered type in registration order.
    pub fn list(&self) -> impl Iterator<Item = &NodeType> {
        self.order.iter().filter_map(|id| self.types.get(id))
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
