//! High-level operations.
//!
//! This module contains the pipeline stages behind `shipwright build`.

pub mod deploy;
pub mod execute;
pub mod generate;
pub mod pipeline;

pub use deploy::{default_hook, DeployHook, NativeMirrorHook, RobocopyHook};
pub use execute::{BuildExecutor, BuildRequest, NinjaExecutor};
pub use generate::{generate, GenerateOptions, Generated};
pub use pipeline::{run, PipelineError, PipelineOptions, PipelineReport};
