//! The project model.
//!
//! A [`Project`] is a static library (possibly header-only) or an executable,
//! fully resolved for one toolchain and one build configuration: every path
//! is concrete and the source list is already discovered and sorted.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ModelError;
use crate::util::fs::{glob_files, sort_paths};

/// Warning level used when a project does not specify one.
pub const DEFAULT_WARNING_LEVEL: u8 = 4;

/// Source patterns used when a project does not specify any.
pub const DEFAULT_SOURCE_PATTERNS: &[&str] = &["**/*.cpp", "**/*.c"];

/// A preprocessor define, with an optional value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Define {
    pub name: String,
    pub value: Option<String>,
}

impl Define {
    /// A define without a value (`-DNAME`).
    pub fn flag(name: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: None,
        }
    }

    /// A define with a value (`-DNAME=VALUE`). The value may be empty.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for Define {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.to_string())),
            None => (s.trim(), None),
        };

        if name.is_empty() {
            return Err(format!("invalid define '{}': missing name", s));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(format!("invalid define '{}': name contains whitespace", s));
        }

        Ok(Define {
            name: name.to_string(),
            value,
        })
    }
}

impl TryFrom<String> for Define {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Define> for String {
    fn from(d: Define) -> Self {
        d.to_string()
    }
}

/// Link-side description of an executable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableSpec {
    /// Library projects to link, by name, in declared order
    pub libraries: Vec<String>,
    /// System libraries, passed to the linker's own search
    pub standard_libraries: Vec<String>,
    /// Additional library search directories
    pub library_dirs: Vec<PathBuf>,
    /// Platform resource script
    pub resource_file: Option<PathBuf>,
    /// Data directory mirrored next to the executable after a build
    pub data_dir: Option<PathBuf>,
}

/// What a project produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProjectKind {
    /// One archive artifact from compiled sources
    StaticLibrary,
    /// Include-dir and define metadata only, never compiled
    HeaderOnly,
    /// A linked program
    Executable(ExecutableSpec),
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::StaticLibrary => "static-lib",
            ProjectKind::HeaderOnly => "header-only",
            ProjectKind::Executable(_) => "executable",
        }
    }

    /// Whether dependents may name this project in `links`.
    pub fn is_library(&self) -> bool {
        matches!(self, ProjectKind::StaticLibrary | ProjectKind::HeaderOnly)
    }
}

/// A resolved project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project name
    pub name: String,
    /// Directory the sources were discovered in
    pub source_dir: PathBuf,
    /// Intermediate output directory (objects, dependency files)
    pub build_dir: PathBuf,
    /// Final artifact directory
    pub deploy_dir: PathBuf,
    /// Sorted source files
    pub sources: Vec<PathBuf>,
    /// Include directories, in the order they are passed to the compiler
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines, in the order supplied
    pub defines: Vec<Define>,
    /// Compiler warning level (0-4)
    pub warning_level: u8,
    pub kind: ProjectKind,
}

impl Project {
    /// Create a project with no sources, includes or defines.
    pub fn new(
        name: impl Into<String>,
        kind: ProjectKind,
        source_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        deploy_dir: impl Into<PathBuf>,
    ) -> Self {
        Project {
            name: name.into(),
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            deploy_dir: deploy_dir.into(),
            sources: Vec::new(),
            include_dirs: Vec::new(),
            defines: Vec::new(),
            warning_level: DEFAULT_WARNING_LEVEL,
            kind,
        }
    }

    /// Set the sources. They are sorted as text and deduplicated.
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = PathBuf>) -> Self {
        self.sources = sources.into_iter().collect();
        sort_paths(&mut self.sources);
        self
    }

    pub fn with_include_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.include_dirs = dirs.into_iter().collect();
        self
    }

    pub fn with_defines(mut self, defines: impl IntoIterator<Item = Define>) -> Self {
        self.defines = defines.into_iter().collect();
        self
    }

    pub fn with_warning_level(mut self, level: u8) -> Self {
        self.warning_level = level;
        self
    }

    /// Whether this project emits no build statements.
    pub fn is_header_only(&self) -> bool {
        self.kind == ProjectKind::HeaderOnly
    }

    /// Executable link description, if this is an executable.
    pub fn executable(&self) -> Option<&ExecutableSpec> {
        match &self.kind {
            ProjectKind::Executable(spec) => Some(spec),
            _ => None,
        }
    }

    /// Names of the library projects this project links against.
    pub fn library_dependencies(&self) -> &[String] {
        self.executable()
            .map(|e| e.libraries.as_slice())
            .unwrap_or(&[])
    }
}

/// Discover the sources of a project.
///
/// Patterns are globs relative to `source_dir`. The result is sorted and
/// deduplicated so directory scan order never reaches the build description.
pub fn discover_sources(
    project: &str,
    source_dir: &Path,
    patterns: &[String],
) -> Result<Vec<PathBuf>, ModelError> {
    glob_files(source_dir, patterns).map_err(|e| {
        tracing::debug!("source discovery failed for {}: {:#}", project, e);
        ModelError::InvalidPattern {
            project: project.to_string(),
            pattern: patterns.join(", "),
        }
    })
}
