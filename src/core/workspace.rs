//! Workspace - manifest resolution.
//!
//! A Workspace is a loaded Shipwright.toml plus its root directory. It turns
//! project definitions into concrete [`Project`]s for one toolchain and one
//! build configuration: directories are laid out, public metadata of `uses`
//! projects is composed in, toolchain overrides are applied and sources are
//! discovered.
//!
//! Every path in a resolved project is relative to the workspace root, which
//! is also the directory the build executor runs in.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::aggregate;
use crate::builder::toolchain::ToolchainPlatform;
use crate::core::configuration::BuildConfiguration;
use crate::core::error::ModelError;
use crate::core::graph::ProjectGraph;
use crate::core::manifest::{Manifest, ProjectDef, ProjectKindDef, MANIFEST_NAME};
use crate::core::project::{discover_sources, ExecutableSpec, Project, ProjectKind};

/// Highest warning level any toolchain understands.
const MAX_WARNING_LEVEL: u8 = 4;

/// A loaded workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    manifest_path: PathBuf,
    manifest: Manifest,
}

impl Workspace {
    /// Load the workspace whose manifest is at `manifest_path`.
    pub fn new(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let root = manifest_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        Ok(Workspace {
            root,
            manifest_path: manifest_path.to_path_buf(),
            manifest,
        })
    }

    /// Create a workspace from an already-parsed manifest.
    pub fn from_manifest(root: impl Into<PathBuf>, manifest: Manifest) -> Self {
        let root = root.into();
        Workspace {
            manifest_path: root.join(MANIFEST_NAME),
            root,
            manifest,
        }
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Build description file, `build-<toolchain>-<config>.ninja`.
    pub fn ninja_file(&self, platform: ToolchainPlatform, config: BuildConfiguration) -> PathBuf {
        self.root
            .join(format!("build-{}-{}.ninja", platform.as_str(), config.as_str()))
    }

    /// `<build-dir>/<name>/<PLATFORM>/<Config>`, relative to the root.
    pub fn build_dir(
        &self,
        name: &str,
        platform: ToolchainPlatform,
        config: BuildConfiguration,
    ) -> PathBuf {
        layout_dir(&self.manifest.workspace.build_dir, name, platform, config)
    }

    /// `<deploy-dir>/<name>/<PLATFORM>/<Config>`, relative to the root.
    pub fn deploy_dir(
        &self,
        name: &str,
        platform: ToolchainPlatform,
        config: BuildConfiguration,
    ) -> PathBuf {
        layout_dir(&self.manifest.workspace.deploy_dir, name, platform, config)
    }

    /// Source directory of a project, relative to the root.
    pub fn source_dir(&self, def: &ProjectDef) -> PathBuf {
        self.manifest
            .workspace
            .code_dir
            .join(def.relative_source_dir())
    }

    /// Project definitions built with `platform`, in declared order.
    pub fn enabled_projects(&self, platform: ToolchainPlatform) -> Vec<&ProjectDef> {
        self.manifest
            .projects
            .iter()
            .filter(|p| p.enabled_for(platform))
            .collect()
    }

    /// Check names, references, cycles and declaration order.
    pub fn validate(&self, platform: ToolchainPlatform) -> Result<(), ModelError> {
        ProjectGraph::from_defs(self.enabled_projects(platform)).validate()
    }

    /// Write the test umbrella file of every project that has one.
    ///
    /// Returns the umbrella paths, relative to the root.
    pub fn aggregate_tests(&self, platform: ToolchainPlatform) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for def in self.enabled_projects(platform) {
            let Some(tests) = &def.test_aggregate else {
                continue;
            };
            let root = self.root.join(&self.manifest.workspace.code_dir).join(&tests.root);
            let output = self.source_dir(def).join(&tests.output);
            aggregate::aggregate(&root, &tests.pattern, &self.root.join(&output))
                .with_context(|| format!("failed to aggregate tests for `{}`", def.name))?;
            written.push(output);
        }
        Ok(written)
    }

    /// Resolve every enabled project for one toolchain and configuration.
    ///
    /// Projects come back in declared order. The manifest is validated first.
    pub fn resolve(
        &self,
        platform: ToolchainPlatform,
        config: BuildConfiguration,
    ) -> Result<Vec<Project>, ModelError> {
        self.validate(platform)?;

        let defs = self.enabled_projects(platform);
        defs.iter()
            .map(|def| self.resolve_project(def, &defs, platform, config))
            .collect()
    }

    fn resolve_project(
        &self,
        def: &ProjectDef,
        enabled: &[&ProjectDef],
        platform: ToolchainPlatform,
        config: BuildConfiguration,
    ) -> Result<Project, ModelError> {
        let source_dir = self.source_dir(def);
        let overrides = def.overrides_for(platform);

        // Public metadata of used projects, then our own, then per-toolchain
        let mut include_dirs = Vec::new();
        let mut defines = Vec::new();
        for name in &def.uses {
            let Some(used) = enabled.iter().find(|p| &p.name == name) else {
                return Err(ModelError::UnknownReference {
                    project: def.name.clone(),
                    reference: name.clone(),
                });
            };
            let used_dir = self.source_dir(used);
            include_dirs.extend(used.public.include_dirs.iter().map(|d| used_dir.join(d)));
            defines.extend(used.public.defines.iter().cloned());
        }
        include_dirs.extend(def.include_dirs.iter().map(|d| source_dir.join(d)));
        defines.extend(def.defines.iter().cloned());
        if let Some(o) = overrides {
            include_dirs.extend(o.include_dirs.iter().map(|d| source_dir.join(d)));
            defines.extend(o.defines.iter().cloned());
        }

        let mut warning_level = def.warning_level;
        if warning_level > MAX_WARNING_LEVEL {
            tracing::warn!(
                "{}: warning level {} clamped to {}",
                def.name,
                warning_level,
                MAX_WARNING_LEVEL
            );
            warning_level = MAX_WARNING_LEVEL;
        }

        let kind = match def.kind {
            ProjectKindDef::HeaderOnly => ProjectKind::HeaderOnly,
            ProjectKindDef::StaticLib => ProjectKind::StaticLibrary,
            ProjectKindDef::Executable => {
                let mut standard_libraries = def.standard_libs.clone();
                let mut library_dirs = def.lib_dirs.clone();
                if let Some(o) = overrides {
                    standard_libraries.extend(o.standard_libs.iter().cloned());
                    library_dirs.extend(o.lib_dirs.iter().cloned());
                }
                ProjectKind::Executable(ExecutableSpec {
                    libraries: def.links.clone(),
                    standard_libraries,
                    library_dirs,
                    resource_file: def.resource.as_ref().map(|r| source_dir.join(r)),
                    data_dir: def.data.clone(),
                })
            }
        };

        let mut sources = Vec::new();
        if kind != ProjectKind::HeaderOnly {
            let mut patterns = def.sources.clone();
            if let Some(o) = overrides {
                patterns.extend(o.sources.iter().cloned());
            }
            let found = discover_sources(&def.name, &self.root.join(&source_dir), &patterns)?;
            sources.extend(
                found
                    .iter()
                    .map(|f| f.strip_prefix(&self.root).unwrap_or(f.as_path()).to_path_buf()),
            );

            // The umbrella file is a source even when the patterns miss it,
            // and its includes are relative to the test root
            if let Some(tests) = &def.test_aggregate {
                sources.push(source_dir.join(&tests.output));
                include_dirs.push(self.manifest.workspace.code_dir.join(&tests.root));
            }

            if sources.is_empty() {
                return Err(ModelError::NoSources {
                    project: def.name.clone(),
                    dir: source_dir,
                });
            }
        }

        dedup_in_order(&mut include_dirs);
        dedup_in_order(&mut defines);

        let project = Project::new(
            def.name.clone(),
            kind,
            source_dir,
            self.build_dir(&def.name, platform, config),
            self.deploy_dir(&def.name, platform, config),
        )
        .with_sources(sources)
        .with_include_dirs(include_dirs)
        .with_defines(defines)
        .with_warning_level(warning_level);

        tracing::debug!(
            "resolved {} ({}, {} sources)",
            project.name,
            project.kind.as_str(),
            project.sources.len()
        );
        Ok(project)
    }
}

fn layout_dir(
    base: &Path,
    name: &str,
    platform: ToolchainPlatform,
    config: BuildConfiguration,
) -> PathBuf {
    base.join(name)
        .join(platform.dir_name())
        .join(config.dir_name())
}

/// Drop exact repeats, keeping the first occurrence.
fn dedup_in_order<T: PartialEq + Clone>(items: &mut Vec<T>) {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    *items = kept;
}

/// Find Shipwright.toml in `start` or any of its ancestors.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_NAME))
        .find(|candidate| candidate.is_file())
}
