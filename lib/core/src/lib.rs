//! Core domain types and utilities for the swarm workflow builder.
//!
//! This crate provides the foundational identifier types and the shared
//! error-handling alias used by the workflow crate and the CLI.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{NodeId, NodeTypeId, ParseIdError};
