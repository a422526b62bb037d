//! Post-build deployment of executable data directories.
//!
//! Each executable with a `data` directory gets it mirrored into
//! `<deploy dir>/data`. A hook reports the copy utility's exit code; codes up
//! to the hook's threshold mean success, possibly with warnings.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::project::Project;
use crate::ops::pipeline::PipelineError;
use crate::util::fs::mirror_dir;
use crate::util::process::ProcessBuilder;

/// Name of the mirrored directory inside a deploy directory.
pub const DATA_DIR_NAME: &str = "data";

/// Mirrors one directory into another.
pub trait DeployHook {
    /// Highest exit code that still counts as success.
    fn threshold(&self) -> i32;

    /// Mirror `source` into `dest`, returning the utility's exit code.
    fn mirror(&self, source: &Path, dest: &Path) -> Result<i32>;
}

/// One data directory to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    pub project: String,
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Deploy targets of the resolved projects, in declared order.
pub fn deploy_targets(root: &Path, projects: &[Project]) -> Vec<DeployTarget> {
    projects
        .iter()
        .filter_map(|p| {
            let data = p.executable()?.data_dir.as_ref()?;
            Some(DeployTarget {
                project: p.name.clone(),
                source: root.join(data),
                dest: root.join(&p.deploy_dir).join(DATA_DIR_NAME),
            })
        })
        .collect()
}

/// Run the hook for every target, stopping at the first failure.
pub fn deploy(targets: &[DeployTarget], hook: &dyn DeployHook) -> Result<(), PipelineError> {
    for target in targets {
        tracing::info!(
            "Deploying {} -> {}",
            target.source.display(),
            target.dest.display()
        );
        let code = hook
            .mirror(&target.source, &target.dest)
            .map_err(|error| PipelineError::Io {
                stage: "deploy",
                error,
            })?;

        if code > hook.threshold() {
            return Err(PipelineError::Deploy {
                project: target.project.clone(),
                code,
                threshold: hook.threshold(),
            });
        }
        if code > 0 {
            tracing::warn!("{}: deploy finished with warnings (code {})", target.project, code);
        }
    }
    Ok(())
}

/// `robocopy /mir`, the Windows mirror utility.
///
/// Exit codes below 8 are bit flags describing what was copied; 8 and up
/// mean at least one file failed.
#[derive(Debug, Clone)]
pub struct RobocopyHook {
    program: PathBuf,
}

impl RobocopyHook {
    pub const THRESHOLD: i32 = 8;

    pub fn new() -> Self {
        RobocopyHook {
            program: PathBuf::from("robocopy"),
        }
    }

    pub fn command(&self, source: &Path, dest: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(["/w:1", "/mir", "/njh", "/njs", "/ndl", "/nc", "/ns", "/np"])
            .arg(source)
            .arg(dest)
    }
}

impl Default for RobocopyHook {
    fn default() -> Self {
        Self::new()
    }
}

impl DeployHook for RobocopyHook {
    fn threshold(&self) -> i32 {
        Self::THRESHOLD
    }

    fn mirror(&self, source: &Path, dest: &Path) -> Result<i32> {
        self.command(source, dest).exit_code()
    }
}

/// In-process mirror for hosts without robocopy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeMirrorHook;

impl DeployHook for NativeMirrorHook {
    fn threshold(&self) -> i32 {
        0
    }

    fn mirror(&self, source: &Path, dest: &Path) -> Result<i32> {
        anyhow::ensure!(
            source.is_dir(),
            "data directory not found: {}",
            source.display()
        );
        let stats = mirror_dir(source, dest)?;
        tracing::debug!("copied {}, removed {}", stats.copied, stats.removed);
        Ok(0)
    }
}

/// The host's deploy hook.
pub fn default_hook() -> Box<dyn DeployHook> {
    if cfg!(windows) {
        Box::new(RobocopyHook::new())
    } else {
        Box::new(NativeMirrorHook)
    }
}
