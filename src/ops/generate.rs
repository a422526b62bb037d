//! Implementation of the generate stage.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::compdb::{emit_compile_commands, COMPDB_NAME};
use crate::builder::toolchain::Toolchain;
use crate::builder::writer::{self, BuildGraph};
use crate::core::configuration::BuildConfiguration;
use crate::core::project::Project;
use crate::core::workspace::Workspace;

/// Options for generation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub config: BuildConfiguration,

    /// Write compile_commands.json next to the build description
    pub emit_compile_commands: bool,

    /// Compute the graph without writing anything
    pub plan_only: bool,
}

impl GenerateOptions {
    pub fn new(config: BuildConfiguration) -> Self {
        GenerateOptions {
            config,
            emit_compile_commands: false,
            plan_only: false,
        }
    }
}

/// Result of generation.
#[derive(Debug)]
pub struct Generated {
    pub graph: BuildGraph,
    pub projects: Vec<Project>,
    /// Build description path; `None` in plan-only mode
    pub ninja_file: Option<PathBuf>,
    pub compile_commands: Option<PathBuf>,
}

/// Validate, aggregate tests, resolve and write the build description.
pub fn generate(
    ws: &Workspace,
    toolchain: &dyn Toolchain,
    opts: &GenerateOptions,
) -> Result<Generated> {
    let platform = toolchain.platform();

    ws.validate(platform)?;

    // The umbrella file must exist before discovery sees the tree
    if !opts.plan_only {
        ws.aggregate_tests(platform)?;
    }

    let projects = ws.resolve(platform, opts.config)?;
    tracing::info!(
        "Generating {} project(s) for {} ({})",
        projects.len(),
        platform,
        opts.config
    );

    if opts.plan_only {
        let graph = writer::generate(&projects, toolchain, opts.config)?;
        return Ok(Generated {
            graph,
            projects,
            ninja_file: None,
            compile_commands: None,
        });
    }

    let ninja_file = ws.ninja_file(platform, opts.config);
    let graph = writer::write(&ninja_file, &projects, toolchain, opts.config)
        .context("failed to generate build description")?;
    tracing::info!(
        "Wrote {} ({} statements)",
        ninja_file.display(),
        graph.statements().count()
    );

    let compile_commands = if opts.emit_compile_commands {
        let path = ws.root().join(COMPDB_NAME);
        let count = emit_compile_commands(&graph, ws.root(), &path)?;
        tracing::info!("Wrote {} ({} entries)", path.display(), count);
        Some(path)
    } else {
        None
    };

    Ok(Generated {
        graph,
        projects,
        ninja_file: Some(ninja_file),
        compile_commands,
    })
}
