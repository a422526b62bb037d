//! Toolchain abstraction for C/C++ build descriptions.
//!
//! A toolchain turns project inputs into build statements for one
//! compiler/linker family. Exactly one toolchain is active per run and the
//! graph writer only ever talks to it through the [`Toolchain`] trait.
//!
//! Toolchain selection priority:
//! 1. `--toolchain` on the command line
//! 2. `[toolchain] platform` in `.shipwright/config.toml` (project, then global)
//! 3. The host platform (Windows: MSVC, Linux: GCC)

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::builder::statement::{BuildStatement, Rule};
use crate::core::configuration::BuildConfiguration;
use crate::core::error::ModelError;
use crate::core::project::Define;

mod detect;
mod gcc;
mod msvc;

pub use detect::{detect_platform, platform_for_os, select_toolchain, toolchain_for};
pub use gcc::GccToolchain;
pub use msvc::MsvcToolchain;

/// Input for a compile statement.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output object file
    pub object: PathBuf,
    /// Include directories, in order
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines, in order
    pub defines: Vec<Define>,
    /// Warning level (0-4)
    pub warning_level: u8,
}

/// Input for an archive statement (creating a static library).
#[derive(Debug, Clone)]
pub struct ArchiveInput {
    /// Object files to archive, in compile order
    pub objects: Vec<PathBuf>,
    /// Output archive file
    pub output: PathBuf,
}

/// Input for a link statement.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Object files to link
    pub objects: Vec<PathBuf>,
    /// Static library artifacts, in declared order
    pub libraries: Vec<PathBuf>,
    /// System libraries resolved by the linker's search rules
    pub standard_libraries: Vec<String>,
    /// Library search paths
    pub library_dirs: Vec<PathBuf>,
    /// Output executable
    pub output: PathBuf,
    /// Compiled resource object, if any
    pub resource: Option<PathBuf>,
}

/// Input for a resource statement.
#[derive(Debug, Clone)]
pub struct ResourceInput {
    /// Resource script
    pub source: PathBuf,
    /// Compiled resource object
    pub output: PathBuf,
}

/// The kind of artifact a project produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    StaticLibrary,
    Executable,
}

/// The toolchain family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainPlatform {
    /// Microsoft Visual C++
    Msvc,
    /// GCC (GNU Compiler Collection)
    Gcc,
}

impl ToolchainPlatform {
    /// Lowercase name used on the command line, in manifests and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainPlatform::Msvc => "msvc",
            ToolchainPlatform::Gcc => "gcc",
        }
    }

    /// Name used in the build and deploy directory layout.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ToolchainPlatform::Msvc => "MSVC",
            ToolchainPlatform::Gcc => "GCC",
        }
    }
}

impl fmt::Display for ToolchainPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolchainPlatform {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "msvc" => Ok(ToolchainPlatform::Msvc),
            "gcc" => Ok(ToolchainPlatform::Gcc),
            _ => Err(ModelError::UnknownToolchain {
                name: s.to_string(),
            }),
        }
    }
}

/// Trait for toolchain implementations.
///
/// Implementations know nothing about the filesystem: every path they see
/// has already been computed by the caller.
pub trait Toolchain: Send + Sync {
    /// Get the toolchain platform.
    fn platform(&self) -> ToolchainPlatform;

    /// Rules emitted once, before any statement.
    fn rules(&self) -> Vec<Rule>;

    /// One source file to one object file.
    fn compile_statement(&self, input: &CompileInput, config: BuildConfiguration)
        -> BuildStatement;

    /// All objects of a static library into one archive.
    fn archive_statement(&self, input: &ArchiveInput) -> BuildStatement;

    /// Objects and libraries into an executable.
    fn link_statement(&self, input: &LinkInput, config: BuildConfiguration) -> BuildStatement;

    /// Resource compilation, for toolchains that have it.
    fn resource_compiler(&self) -> Option<&dyn ResourceCompiler> {
        None
    }

    /// Map a base name to the toolchain's file naming convention.
    fn artifact_name(&self, kind: ArtifactKind, base: &str) -> String;

    /// Get the object file extension.
    fn object_extension(&self) -> &str;
}

/// Capability: compile a platform resource script into a linkable object.
pub trait ResourceCompiler {
    fn resource_statement(&self, input: &ResourceInput) -> BuildStatement;

    /// Get the compiled resource extension.
    fn resource_extension(&self) -> &str;
}

/// Object path for a source: `<build_dir>/<stem>.<ext>`.
pub fn object_path(toolchain: &dyn Toolchain, build_dir: &Path, source: &Path) -> PathBuf {
    with_stem_extension(build_dir, source, toolchain.object_extension())
}

/// Static library path: `<deploy_dir>/<artifact name>`.
pub fn library_path(toolchain: &dyn Toolchain, deploy_dir: &Path, name: &str) -> PathBuf {
    deploy_dir.join(toolchain.artifact_name(ArtifactKind::StaticLibrary, name))
}

/// Executable path: `<deploy_dir>/<artifact name>`.
pub fn executable_path(toolchain: &dyn Toolchain, deploy_dir: &Path, name: &str) -> PathBuf {
    deploy_dir.join(toolchain.artifact_name(ArtifactKind::Executable, name))
}

/// `<dir>/<stem of file>.<ext>`.
pub(crate) fn with_stem_extension(dir: &Path, file: &Path, ext: &str) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if ext.is_empty() {
        dir.join(stem)
    } else {
        dir.join(format!("{}.{}", stem, ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!("MSVC".parse::<ToolchainPlatform>().unwrap(), ToolchainPlatform::Msvc);
        assert_eq!("gcc".parse::<ToolchainPlatform>().unwrap(), ToolchainPlatform::Gcc);
        assert!(matches!(
            "clang".parse::<ToolchainPlatform>(),
            Err(ModelError::UnknownToolchain { .. })
        ));
    }

    #[test]
    fn test_artifact_paths() {
        let gcc = GccToolchain::new();
        let msvc = MsvcToolchain::new();

        assert_eq!(
            object_path(&gcc, Path::new("Build/core"), Path::new("Code/core/sub/math.cpp")),
            PathBuf::from("Build/core/math.o")
        );
        assert_eq!(
            object_path(&msvc, Path::new("Build/core"), Path::new("Code/core/math.c")),
            PathBuf::from("Build/core/math.obj")
        );
        assert_eq!(
            library_path(&gcc, Path::new("Deploy/core"), "core"),
            PathBuf::from("Deploy/core/libcore.a")
        );
        assert_eq!(
            library_path(&msvc, Path::new("Deploy/core"), "core"),
            PathBuf::from("Deploy/core/core.lib")
        );
        assert_eq!(
            executable_path(&gcc, Path::new("Deploy/app"), "app"),
            PathBuf::from("Deploy/app/app")
        );
        assert_eq!(
            executable_path(&msvc, Path::new("Deploy/app"), "app"),
            PathBuf::from("Deploy/app/app.exe")
        );
    }

    #[test]
    fn test_resource_capability() {
        assert!(GccToolchain::new().resource_compiler().is_none());
        assert!(MsvcToolchain::new().resource_compiler().is_some());
    }
}
