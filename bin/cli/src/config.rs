//! Command line configuration.
//!
//! Loaded via the `config` crate from an optional file (TOML or JSON, by
//! extension) overlaid by `SWARM__*` environment variables, e.g.
//! `SWARM__LAYOUT__COLUMNS=4` or `SWARM__CATALOG_PATH=types.json`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use swarm_workflow::{GridLayout, ValidatorOptions};

/// Configuration composed from library configs.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Node type catalog to merge over the built-in types.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Grid used for nodes stored without a position.
    #[serde(default)]
    pub layout: GridLayout,

    /// Graph validation options.
    #[serde(default)]
    pub validator: ValidatorOptions,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            catalog_path: None,
            layout: GridLayout::default(),
            validator: ValidatorOptions::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from `file` (if any) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(file, environment())
    }

    fn load_with_env(
        file: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        builder
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("SWARM")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
