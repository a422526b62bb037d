//! Test fixtures for common test scenarios.
//!
//! In-memory projects laid out like a resolved workspace (`Code/<name>`,
//! `Build/<name>`, `Deploy/<name>`), and on-disk workspaces backed by a
//! temporary directory.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::manifest::{Manifest, MANIFEST_NAME};
use crate::core::project::{ExecutableSpec, Project, ProjectKind};
use crate::core::workspace::Workspace;

fn project(name: &str, kind: ProjectKind, sources: &[&str]) -> Project {
    let source_dir = PathBuf::from("Code").join(name);
    Project::new(
        name,
        kind,
        source_dir.clone(),
        PathBuf::from("Build").join(name),
        PathBuf::from("Deploy").join(name),
    )
    .with_sources(sources.iter().map(|s| source_dir.join(s)))
    .with_include_dirs([source_dir.clone()])
}

/// A source-bearing static library.
pub fn static_lib(name: &str, sources: &[&str]) -> Project {
    project(name, ProjectKind::StaticLibrary, sources)
}

/// A header-only library.
pub fn header_only(name: &str) -> Project {
    project(name, ProjectKind::HeaderOnly, &[])
}

/// An executable linking `libraries` in the given order.
pub fn executable(name: &str, sources: &[&str], libraries: &[&str]) -> Project {
    project(
        name,
        ProjectKind::Executable(ExecutableSpec {
            libraries: libraries.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }),
        sources,
    )
}

/// A workspace on disk: a manifest plus files, in a temporary directory.
pub struct WorkspaceFixture {
    dir: TempDir,
    manifest: String,
}

impl WorkspaceFixture {
    /// Create a workspace with the given Shipwright.toml contents.
    pub fn new(manifest: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::write(dir.path().join(MANIFEST_NAME), manifest)
            .expect("failed to write manifest");
        WorkspaceFixture {
            dir,
            manifest: manifest.to_string(),
        }
    }

    /// Add a file, relative to the workspace root.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        std::fs::write(&path, contents).expect("failed to write fixture file");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join(MANIFEST_NAME)
    }

    /// Load the workspace.
    pub fn workspace(&self) -> Workspace {
        let manifest = Manifest::parse(&self.manifest).expect("fixture manifest must parse");
        Workspace::from_manifest(self.root(), manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_fixtures() {
        let lib = static_lib("core", &["b.cpp", "a.cpp"]);
        assert_eq!(
            lib.sources,
            vec![PathBuf::from("Code/core/a.cpp"), PathBuf::from("Code/core/b.cpp")]
        );
        assert_eq!(lib.build_dir, PathBuf::from("Build/core"));

        assert!(header_only("glm").is_header_only());
        assert_eq!(
            executable("app", &["main.cpp"], &["core"]).library_dependencies(),
            ["core".to_string()]
        );
    }

    #[test]
    fn test_workspace_fixture() {
        let fx = WorkspaceFixture::new("[[project]]\nname = \"a\"\nkind = \"header-only\"\n")
            .file("Code/a/a.h", "");
        assert!(fx.manifest_path().is_file());
        assert!(fx.root().join("Code/a/a.h").is_file());
        assert_eq!(fx.workspace().manifest().projects.len(), 1);
    }
}
