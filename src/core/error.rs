//! Project model errors.
//!
//! These are configuration and contract violations: they are reported once
//! and never retried.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error while building or validating the project model.
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("unsupported host platform `{os}`")]
    #[diagnostic(
        code(shipwright::unsupported_platform),
        help("pass `--toolchain msvc|gcc` or set `[toolchain] platform` in .shipwright/config.toml")
    )]
    UnsupportedPlatform { os: String },

    #[error("toolchain `{toolchain}` cannot compile resource `{}` for project `{project}`", resource.display())]
    #[diagnostic(
        code(shipwright::unsupported_capability),
        help("restrict the project to resource-capable toolchains with `toolchains = [\"msvc\"]`")
    )]
    UnsupportedCapability {
        toolchain: String,
        project: String,
        resource: PathBuf,
    },

    #[error("project `{name}` is declared more than once")]
    #[diagnostic(code(shipwright::duplicate_project))]
    DuplicateProject { name: String },

    #[error("project `{project}` references unknown project `{reference}`")]
    #[diagnostic(
        code(shipwright::unknown_reference),
        help("declare `{reference}` in Shipwright.toml, or check its `toolchains` filter")
    )]
    UnknownReference { project: String, reference: String },

    #[error("project `{project}` links `{reference}`, which is not a library")]
    #[diagnostic(code(shipwright::not_a_library))]
    NotALibrary { project: String, reference: String },

    #[error("dependency cycle between projects: {}", projects.join(" -> "))]
    #[diagnostic(
        code(shipwright::cycle),
        help("break the cycle by removing a `uses` or `links` entry")
    )]
    Cycle { projects: Vec<String> },

    #[error("project `{project}` depends on `{dependency}`, which is declared after it")]
    #[diagnostic(
        code(shipwright::out_of_order),
        help("move `{dependency}` above `{project}` in Shipwright.toml")
    )]
    OutOfOrder { project: String, dependency: String },

    #[error("project `{project}` has no source files in {}", dir.display())]
    #[diagnostic(
        code(shipwright::no_sources),
        help("check `path` and `sources`, or declare the project with kind = \"header-only\"")
    )]
    NoSources { project: String, dir: PathBuf },

    #[error(
        "sources `{}` and `{}` of project `{project}` map to the same object file",
        first.display(),
        second.display()
    )]
    #[diagnostic(code(shipwright::object_collision), help("rename one of the sources"))]
    ObjectCollision {
        project: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("invalid source pattern `{pattern}` in project `{project}`")]
    #[diagnostic(code(shipwright::invalid_pattern))]
    InvalidPattern { project: String, pattern: String },

    #[error("unknown toolchain `{name}`")]
    #[diagnostic(code(shipwright::unknown_toolchain), help("expected `msvc` or `gcc`"))]
    UnknownToolchain { name: String },
}
