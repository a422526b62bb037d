//! Shipwright.toml manifest parsing and schema.
//!
//! The manifest is the declarative list of projects in a workspace. It is
//! pure configuration: nothing here touches the filesystem beyond reading
//! the manifest itself. Resolution into concrete [`Project`]s lives in
//! [`crate::core::workspace`].
//!
//! [`Project`]: crate::core::project::Project

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::toolchain::ToolchainPlatform;
use crate::core::project::{Define, DEFAULT_SOURCE_PATTERNS, DEFAULT_WARNING_LEVEL};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Shipwright.toml";

/// The parsed Shipwright.toml manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Workspace-wide directory layout
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Projects, in dependency order
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectDef>,
}

/// The `[workspace]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Root of all project source directories
    pub code_dir: PathBuf,
    /// Root of intermediate outputs
    pub build_dir: PathBuf,
    /// Root of final artifacts
    pub deploy_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            code_dir: PathBuf::from("Code"),
            build_dir: PathBuf::from("Build"),
            deploy_dir: PathBuf::from("Deploy"),
        }
    }
}

/// Kind of project as written in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKindDef {
    #[serde(alias = "staticlib")]
    StaticLib,
    HeaderOnly,
    #[serde(alias = "exe")]
    Executable,
}

/// Metadata a project exports to projects that `use` it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PublicDef {
    /// Include directories, relative to the exporting project's source dir
    pub include_dirs: Vec<PathBuf>,
    pub defines: Vec<Define>,
}

/// Additions that only apply for one toolchain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ToolchainOverride {
    pub sources: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub defines: Vec<Define>,
    pub standard_libs: Vec<String>,
    pub lib_dirs: Vec<PathBuf>,
}

/// Test aggregation settings for an executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TestAggregateDef {
    /// Directory searched for test fragments, relative to code-dir
    pub root: PathBuf,
    /// Glob pattern, relative to `root`
    #[serde(default = "default_test_pattern")]
    pub pattern: String,
    /// Umbrella file, relative to the owning project's source dir
    #[serde(default = "default_test_output")]
    pub output: PathBuf,
}

fn default_test_pattern() -> String {
    "**/*.test.cpp".to_string()
}

fn default_test_output() -> PathBuf {
    PathBuf::from("test.cpp")
}

/// A `[[project]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectDef {
    pub name: String,

    pub kind: ProjectKindDef,

    /// Source directory relative to code-dir (defaults to the name)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Source glob patterns relative to the source directory
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub defines: Vec<Define>,

    #[serde(default = "default_warning_level")]
    pub warning_level: u8,

    /// Projects whose public metadata is composed into this one
    #[serde(default)]
    pub uses: Vec<String>,

    #[serde(default)]
    pub public: PublicDef,

    /// Toolchains this project is built for (empty = all)
    #[serde(default)]
    pub toolchains: Vec<ToolchainPlatform>,

    /// Per-toolchain additions, keyed by toolchain name
    #[serde(default, rename = "toolchain")]
    pub toolchain_overrides: BTreeMap<String, ToolchainOverride>,

    // Executable-only fields
    /// Library projects to link, in order
    #[serde(default)]
    pub links: Vec<String>,

    #[serde(default)]
    pub standard_libs: Vec<String>,

    /// Library search directories, relative to the workspace root
    #[serde(default)]
    pub lib_dirs: Vec<PathBuf>,

    /// Resource script relative to the source directory
    #[serde(default)]
    pub resource: Option<PathBuf>,

    /// Data directory relative to the workspace root, mirrored on deploy
    #[serde(default)]
    pub data: Option<PathBuf>,

    #[serde(default)]
    pub test_aggregate: Option<TestAggregateDef>,
}

fn default_sources() -> Vec<String> {
    DEFAULT_SOURCE_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_warning_level() -> u8 {
    DEFAULT_WARNING_LEVEL
}

impl ProjectDef {
    /// Whether this project is built with `platform`.
    pub fn enabled_for(&self, platform: ToolchainPlatform) -> bool {
        self.toolchains.is_empty() || self.toolchains.contains(&platform)
    }

    /// Overrides for `platform`, if any.
    pub fn overrides_for(&self, platform: ToolchainPlatform) -> Option<&ToolchainOverride> {
        self.toolchain_overrides.get(platform.as_str())
    }

    /// Source directory relative to code-dir.
    pub fn relative_source_dir(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.name))
    }
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse a manifest from a string.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;

        // Override tables are keyed by toolchain name; a typo would be ignored
        for def in &manifest.projects {
            for key in def.toolchain_overrides.keys() {
                key.parse::<ToolchainPlatform>().with_context(|| {
                    format!("in `[project.toolchain.{}]` of project `{}`", key, def.name)
                })?;
            }
        }

        Ok(manifest)
    }

    /// Find a project definition by name.
    pub fn project(&self, name: &str) -> Option<&ProjectDef> {
        self.projects.iter().find(|p| p.name == name)
    }
}
