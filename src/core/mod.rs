//! Core data structures for Shipwright.
//!
//! This module contains the project model:
//! - Build configurations
//! - Projects and their kinds
//! - The Shipwright.toml manifest
//! - Workspace resolution and dependency validation

pub mod configuration;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod project;
pub mod workspace;

pub use configuration::BuildConfiguration;
pub use error::ModelError;
pub use graph::ProjectGraph;
pub use manifest::{Manifest, MANIFEST_NAME};
pub use project::{Define, ExecutableSpec, Project, ProjectKind};
pub use workspace::{find_manifest, Workspace};
