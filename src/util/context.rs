//! Global context for Shipwright operations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::MANIFEST_NAME;
use crate::core::workspace::find_manifest;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context: the working directory commands resolve paths against.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext { cwd })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext { cwd }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Locate the manifest: an explicit path, or Shipwright.toml in the
    /// working directory or one of its ancestors.
    pub fn find_manifest(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            let path = self.cwd.join(path);
            anyhow::ensure!(path.is_file(), "manifest not found: {}", path.display());
            return Ok(path);
        }

        find_manifest(&self.cwd).with_context(|| {
            format!(
                "could not find {} in {} or any parent directory",
                MANIFEST_NAME,
                self.cwd.display()
            )
        })
    }

    /// Layered user configuration for a workspace root.
    pub fn config(&self, workspace_root: &Path) -> Config {
        load_config(
            global_config_path().as_deref(),
            &project_config_path(workspace_root),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_manifest_in_parent() {
        let tmp = TempDir::new().unwrap();
        let manifest = tmp.path().join(MANIFEST_NAME);
        std::fs::write(&manifest, "").unwrap();
        let nested = tmp.path().join("Code/app");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested);
        assert_eq!(ctx.find_manifest(None).unwrap(), manifest);
    }

    #[test]
    fn test_explicit_manifest_must_exist() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());

        let err = ctx.find_manifest(Some(Path::new("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("manifest not found"));
    }

    #[test]
    fn test_no_manifest() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());
        assert!(ctx.find_manifest(None).is_err());
    }
}
