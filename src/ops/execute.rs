//! The external build executor.

use std::path::{Path, PathBuf};

use crate::ops::pipeline::PipelineError;
use crate::util::process::{find_executable, ProcessBuilder};

/// What to build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Directory the executor runs in; every path in the description is
    /// relative to it
    pub root: PathBuf,
    pub build_file: PathBuf,
    pub jobs: Option<usize>,
}

/// Something that consumes a build description and reports an exit code.
pub trait BuildExecutor {
    /// Run the build to completion. Blocks, with no timeout.
    fn build(&self, request: &BuildRequest) -> Result<i32, PipelineError>;
}

/// Runs `ninja -f <file>`.
#[derive(Debug, Clone, Default)]
pub struct NinjaExecutor {
    /// Configured ninja path; looked up on PATH when unset
    configured: Option<PathBuf>,
}

impl NinjaExecutor {
    pub fn new(configured: Option<PathBuf>) -> Self {
        NinjaExecutor { configured }
    }

    /// Resolve the ninja executable.
    pub fn locate(&self) -> Result<PathBuf, PipelineError> {
        let name = self
            .configured
            .clone()
            .unwrap_or_else(|| PathBuf::from("ninja"));

        if name.components().count() > 1 {
            if name.is_file() {
                return Ok(name);
            }
        } else if let Some(path) = find_executable(&name.to_string_lossy()) {
            return Ok(path);
        }

        Err(PipelineError::ExecutorNotFound {
            program: name.display().to_string(),
        })
    }

    /// The command that would run for a request.
    pub fn command(&self, program: &Path, request: &BuildRequest) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(program)
            .arg("-f")
            .arg(&request.build_file)
            .cwd(&request.root);
        if let Some(jobs) = request.jobs {
            cmd = cmd.arg("-j").arg(jobs.to_string());
        }
        cmd
    }
}

impl BuildExecutor for NinjaExecutor {
    fn build(&self, request: &BuildRequest) -> Result<i32, PipelineError> {
        let program = self.locate()?;
        let cmd = self.command(&program, request);
        tracing::info!("Running {}", cmd.display_command());

        cmd.exit_code().map_err(|error| PipelineError::Io {
            stage: "build",
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BuildRequest {
        BuildRequest {
            root: PathBuf::from("/work"),
            build_file: PathBuf::from("/work/build-gcc-debug.ninja"),
            jobs: Some(8),
        }
    }

    #[test]
    fn test_command_line() {
        let ninja = NinjaExecutor::default();
        let cmd = ninja.command(Path::new("ninja"), &request());
        assert_eq!(
            cmd.display_command(),
            "ninja -f /work/build-gcc-debug.ninja -j 8"
        );
    }

    #[test]
    fn test_missing_configured_ninja() {
        let ninja = NinjaExecutor::new(Some(PathBuf::from("/no/such/dir/ninja")));
        assert!(matches!(
            ninja.locate(),
            Err(PipelineError::ExecutorNotFound { program }) if program == "/no/such/dir/ninja"
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_exit_code_is_reported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let script = tmp.path().join("fake-ninja");
        std::fs::write(&script, "#!/bin/sh\nexit 1\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let ninja = NinjaExecutor::new(Some(script));
        let code = ninja
            .build(&BuildRequest {
                root: tmp.path().to_path_buf(),
                build_file: tmp.path().join("build-gcc-debug.ninja"),
                jobs: None,
            })
            .unwrap();
        assert_eq!(code, 1);
    }
}
