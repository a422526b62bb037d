//! Build description generation.
//!
//! This module turns resolved projects into ninja build statements for the
//! active toolchain, and synthesizes the test umbrella source.

pub mod aggregate;
pub mod compdb;
pub mod ninja;
pub mod statement;
pub mod toolchain;
pub mod writer;

pub use statement::{BuildStatement, Rule, StatementKind};
pub use toolchain::{
    select_toolchain, GccToolchain, MsvcToolchain, ResourceCompiler, Toolchain, ToolchainPlatform,
};
pub use writer::{generate, BuildGraph};
