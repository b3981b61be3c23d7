//! Error types for the command line front end.

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that stop a command.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// An input file could not be read.
    Read { path: PathBuf, details: String },
    /// An input file is not a valid workflow document.
    Parse { path: PathBuf, details: String },
    /// The workflow breaks a structural rule.
    Structure { details: String },
    /// The workflow failed validation, so no plan exists.
    Invalid { details: String },
    /// Output could not be produced.
    Output { details: String },
}

impl CliError {
    pub(crate) fn read(path: &Path, error: impl fmt::Display) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }

    pub(crate) fn parse(path: &Path, error: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {details}"),
            Self::Read { path, details } => {
                write!(f, "failed to read '{}': {details}", path.display())
            }
            Self::Parse { path, details } => {
                write!(f, "failed to parse workflow '{}': {details}", path.display())
            }
            Self::Structure { details } => write!(f, "malformed workflow: {details}"),
            Self::Invalid { details } => write!(f, "workflow is not valid: {details}"),
            Self::Output { details } => write!(f, "failed to write output: {details}"),
        }
    }
}

impl std::error::Error for CliError {}
