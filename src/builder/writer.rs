//! Build graph writer.
//!
//! Walks the resolved projects in their declared order and asks the active
//! toolchain for one compile statement per source, one archive statement per
//! static library and one link statement per executable. The result is a
//! [`BuildGraph`], rendered to ninja syntax with [`BuildGraph::render`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::builder::ninja::NinjaWriter;
use crate::builder::statement::{BuildStatement, Rule};
use crate::builder::toolchain::{
    executable_path, library_path, object_path, with_stem_extension, ArchiveInput, CompileInput,
    LinkInput, ResourceInput, Toolchain, ToolchainPlatform,
};
use crate::core::configuration::BuildConfiguration;
use crate::core::error::ModelError;
use crate::core::project::{Project, ProjectKind};
use crate::util::fs::write_string;

/// Minimum executor version understood by the emitted file.
pub const NINJA_REQUIRED_VERSION: &str = "1.3";

/// Statements emitted for one project.
#[derive(Debug, Clone, Serialize)]
pub struct EmittedProject {
    pub name: String,
    pub kind: &'static str,
    /// Archive or executable path; `None` for header-only libraries
    pub artifact: Option<PathBuf>,
    pub statements: Vec<BuildStatement>,
}

/// The complete build description for one toolchain and configuration.
#[derive(Debug, Clone, Serialize)]
pub struct BuildGraph {
    pub toolchain: ToolchainPlatform,
    pub configuration: BuildConfiguration,
    pub rules: Vec<Rule>,
    pub projects: Vec<EmittedProject>,
}

impl BuildGraph {
    /// All statements in emission order.
    pub fn statements(&self) -> impl Iterator<Item = &BuildStatement> {
        self.projects.iter().flat_map(|p| p.statements.iter())
    }

    /// Statements emitted for one project.
    pub fn project(&self, name: &str) -> Option<&EmittedProject> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Look up the rule a statement instantiates.
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Render to ninja syntax.
    pub fn render(&self) -> String {
        let mut w = NinjaWriter::new();
        w.comment(&format!(
            "Generated by shipwright for {} ({}). Do not edit.",
            self.toolchain, self.configuration
        ));
        w.newline();
        w.variable("ninja_required_version", NINJA_REQUIRED_VERSION);
        w.newline();

        for rule in &self.rules {
            w.rule(rule);
        }

        for project in &self.projects {
            if project.statements.is_empty() {
                continue;
            }
            w.comment(&format!("{} ({})", project.name, project.kind));
            for stmt in &project.statements {
                w.build(stmt);
            }
        }

        w.finish()
    }
}

/// Translate projects into a build graph.
///
/// Projects must already be in dependency order: every library an
/// executable links must have been emitted before it.
pub fn generate(
    projects: &[Project],
    toolchain: &dyn Toolchain,
    config: BuildConfiguration,
) -> Result<BuildGraph, ModelError> {
    // Library name -> archive path, None when header-only
    let mut artifacts: HashMap<&str, Option<PathBuf>> = HashMap::new();
    let mut emitted = Vec::with_capacity(projects.len());

    for project in projects {
        let out = emit_project(project, toolchain, config, &artifacts)?;
        if project.kind.is_library() {
            artifacts.insert(project.name.as_str(), out.artifact.clone());
        }
        emitted.push(out);
    }

    Ok(BuildGraph {
        toolchain: toolchain.platform(),
        configuration: config,
        rules: toolchain.rules(),
        projects: emitted,
    })
}

/// Generate and write the build description to `path`.
pub fn write(
    path: &Path,
    projects: &[Project],
    toolchain: &dyn Toolchain,
    config: BuildConfiguration,
) -> Result<BuildGraph> {
    let graph = generate(projects, toolchain, config)?;
    write_string(path, &graph.render()).context("failed to write build description")?;
    Ok(graph)
}

fn emit_project(
    project: &Project,
    toolchain: &dyn Toolchain,
    config: BuildConfiguration,
    artifacts: &HashMap<&str, Option<PathBuf>>,
) -> Result<EmittedProject, ModelError> {
    let mut out = EmittedProject {
        name: project.name.clone(),
        kind: project.kind.as_str(),
        artifact: None,
        statements: Vec::new(),
    };

    if project.is_header_only() {
        tracing::debug!("{}: header-only, no statements", project.name);
        return Ok(out);
    }

    let objects = compile_all(project, toolchain, config, &mut out.statements)?;

    match &project.kind {
        ProjectKind::HeaderOnly => {}
        ProjectKind::StaticLibrary => {
            let output = library_path(toolchain, &project.deploy_dir, &project.name);
            out.statements.push(toolchain.archive_statement(&ArchiveInput {
                objects,
                output: output.clone(),
            }));
            out.artifact = Some(output);
        }
        ProjectKind::Executable(exe) => {
            // Resource first so its object exists as a link input
            let resource = match &exe.resource_file {
                Some(source) => {
                    let rc = toolchain.resource_compiler().ok_or_else(|| {
                        ModelError::UnsupportedCapability {
                            toolchain: toolchain.platform().to_string(),
                            project: project.name.clone(),
                            resource: source.clone(),
                        }
                    })?;
                    let output =
                        with_stem_extension(&project.build_dir, source, rc.resource_extension());
                    out.statements.push(rc.resource_statement(&ResourceInput {
                        source: source.clone(),
                        output: output.clone(),
                    }));
                    Some(output)
                }
                None => None,
            };

            let mut libraries = Vec::with_capacity(exe.libraries.len());
            for name in &exe.libraries {
                match artifacts.get(name.as_str()) {
                    Some(Some(path)) => libraries.push(path.clone()),
                    Some(None) => {}
                    None => {
                        return Err(ModelError::OutOfOrder {
                            project: project.name.clone(),
                            dependency: name.clone(),
                        })
                    }
                }
            }

            let output = executable_path(toolchain, &project.deploy_dir, &project.name);
            out.statements.push(toolchain.link_statement(
                &LinkInput {
                    objects,
                    libraries,
                    standard_libraries: exe.standard_libraries.clone(),
                    library_dirs: exe.library_dirs.clone(),
                    output: output.clone(),
                    resource,
                },
                config,
            ));
            out.artifact = Some(output);
        }
    }

    tracing::debug!("{}: {} statements", project.name, out.statements.len());
    Ok(out)
}

/// Emit one compile statement per source, returning the objects in source order.
fn compile_all(
    project: &Project,
    toolchain: &dyn Toolchain,
    config: BuildConfiguration,
    statements: &mut Vec<BuildStatement>,
) -> Result<Vec<PathBuf>, ModelError> {
    if project.sources.is_empty() {
        return Err(ModelError::NoSources {
            project: project.name.clone(),
            dir: project.source_dir.clone(),
        });
    }

    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    let mut objects = Vec::with_capacity(project.sources.len());

    for source in &project.sources {
        let object = object_path(toolchain, &project.build_dir, source);
        if let Some(first) = seen.insert(object.clone(), source) {
            return Err(ModelError::ObjectCollision {
                project: project.name.clone(),
                first: first.to_path_buf(),
                second: source.clone(),
            });
        }

        statements.push(toolchain.compile_statement(
            &CompileInput {
                source: source.clone(),
                object: object.clone(),
                include_dirs: project.include_dirs.clone(),
                defines: project.defines.clone(),
                warning_level: project.warning_level,
            },
            config,
        ));
        objects.push(object);
    }

    Ok(objects)
}
