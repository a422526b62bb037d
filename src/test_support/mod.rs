//! Test utilities and doubles for Shipwright unit tests.
//!
//! The pipeline talks to the outside world through [`BuildExecutor`] and
//! [`DeployHook`]. The recording doubles here stand in for ninja and the
//! copy utility: they return a fixed exit code and remember every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use shipwright::test_support::{RecordingExecutor, RecordingDeploy};
//!
//! let executor = RecordingExecutor::new(1);
//! let hook = RecordingDeploy::new(8, 0);
//! // run the pipeline, then inspect executor.requests() and hook.calls()
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;

use crate::ops::deploy::DeployHook;
use crate::ops::execute::{BuildExecutor, BuildRequest};
use crate::ops::pipeline::PipelineError;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Build executor that records requests and exits with a fixed code.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    code: i32,
    requests: Mutex<Vec<BuildRequest>>,
}

impl RecordingExecutor {
    pub fn new(code: i32) -> Self {
        RecordingExecutor {
            code,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<BuildRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl BuildExecutor for RecordingExecutor {
    fn build(&self, request: &BuildRequest) -> Result<i32, PipelineError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.code)
    }
}

/// Deploy hook that records `(source, dest)` pairs and returns a fixed code.
#[derive(Debug, Default)]
pub struct RecordingDeploy {
    threshold: i32,
    code: i32,
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl RecordingDeploy {
    pub fn new(threshold: i32, code: i32) -> Self {
        RecordingDeploy {
            threshold,
            code,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl DeployHook for RecordingDeploy {
    fn threshold(&self) -> i32 {
        self.threshold
    }

    fn mirror(&self, source: &Path, dest: &Path) -> Result<i32> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), dest.to_path_buf()));
        Ok(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_executor() {
        let executor = RecordingExecutor::new(2);
        let request = BuildRequest {
            root: PathBuf::from("/w"),
            build_file: PathBuf::from("/w/build-gcc-debug.ninja"),
            jobs: None,
        };
        assert_eq!(executor.build(&request).unwrap(), 2);
        assert_eq!(executor.requests().len(), 1);
    }

    #[test]
    fn test_recording_deploy() {
        let hook = RecordingDeploy::new(8, 3);
        assert_eq!(hook.mirror(Path::new("a"), Path::new("b")).unwrap(), 3);
        assert_eq!(hook.threshold(), 8);
        assert_eq!(hook.calls(), vec![(PathBuf::from("a"), PathBuf::from("b"))]);
    }
}
