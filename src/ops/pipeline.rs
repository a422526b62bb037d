//! The pipeline driver: generate, build, deploy.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::builder::toolchain::Toolchain;
use crate::core::configuration::BuildConfiguration;
use crate::core::workspace::Workspace;
use crate::ops::deploy::{deploy, deploy_targets, DeployHook};
use crate::ops::execute::{BuildExecutor, BuildRequest};
use crate::ops::generate::{generate, GenerateOptions};

/// A failed pipeline stage.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error("generation failed: {0:#}")]
    #[diagnostic(code(shipwright::generate))]
    Generate(anyhow::Error),

    #[error("build failed (executor exited with code {code})")]
    #[diagnostic(code(shipwright::build))]
    Build { code: i32 },

    #[error("deploy of `{project}` failed with code {code} (threshold {threshold})")]
    #[diagnostic(code(shipwright::deploy))]
    Deploy {
        project: String,
        code: i32,
        threshold: i32,
    },

    #[error("build executor `{program}` not found")]
    #[diagnostic(
        code(shipwright::executor_not_found),
        help("install ninja, or set `[build] ninja` in .shipwright/config.toml")
    )]
    ExecutorNotFound { program: String },

    #[error("{stage} stage failed: {error:#}")]
    #[diagnostic(code(shipwright::io))]
    Io {
        stage: &'static str,
        error: anyhow::Error,
    },
}

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub config: BuildConfiguration,
    /// Generate only; skip build and deploy
    pub no_build: bool,
    /// Skip deploy
    pub no_deploy: bool,
    pub emit_compile_commands: bool,
    pub jobs: Option<usize>,
}

impl PipelineOptions {
    pub fn new(config: BuildConfiguration) -> Self {
        PipelineOptions {
            config,
            no_build: false,
            no_deploy: false,
            emit_compile_commands: false,
            jobs: None,
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub ninja_file: PathBuf,
    pub statements: usize,
    pub built: bool,
    /// Projects whose data directories were deployed
    pub deployed: Vec<String>,
}

/// Run the pipeline.
///
/// Stages run in order and the first failure stops the run: a failed build
/// never deploys.
pub fn run(
    ws: &Workspace,
    toolchain: &dyn Toolchain,
    opts: &PipelineOptions,
    executor: &dyn BuildExecutor,
    hook: &dyn DeployHook,
) -> Result<PipelineReport, PipelineError> {
    let mut gen_opts = GenerateOptions::new(opts.config);
    gen_opts.emit_compile_commands = opts.emit_compile_commands;

    let generated = generate(ws, toolchain, &gen_opts).map_err(PipelineError::Generate)?;
    let ninja_file = generated
        .ninja_file
        .clone()
        .unwrap_or_else(|| ws.ninja_file(toolchain.platform(), opts.config));

    let mut report = PipelineReport {
        ninja_file: ninja_file.clone(),
        statements: generated.graph.statements().count(),
        ..Default::default()
    };

    if opts.no_build {
        tracing::info!("Skipping build (--no-build)");
        return Ok(report);
    }

    let code = executor.build(&BuildRequest {
        root: ws.root().to_path_buf(),
        build_file: ninja_file,
        jobs: opts.jobs,
    })?;
    if code != 0 {
        return Err(PipelineError::Build { code });
    }
    report.built = true;

    if opts.no_deploy {
        tracing::info!("Skipping deploy (--no-deploy)");
        return Ok(report);
    }

    let targets = deploy_targets(ws.root(), &generated.projects);
    deploy(&targets, hook)?;
    report.deployed = targets.into_iter().map(|t| t.project).collect();

    Ok(report)
}
