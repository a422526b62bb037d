//! Shipwright - a ninja build-description generator for C/C++ trees
//!
//! This crate turns a declarative list of static libraries, header-only
//! libraries and executables into a ninja build file for an MSVC-style or
//! GCC-style toolchain, then drives ninja and deploys runtime data.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test fixtures and recording doubles for Shipwright unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildGraph, Toolchain, ToolchainPlatform};
pub use core::{BuildConfiguration, ModelError, Project, Workspace};
pub use ops::PipelineError;
pub use util::context::GlobalContext;
