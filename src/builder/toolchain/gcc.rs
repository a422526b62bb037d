//! GCC toolchain implementation.

use std::path::PathBuf;

use crate::builder::statement::{join_args, quote_arg, BuildStatement, Rule, StatementKind};
use crate::core::configuration::BuildConfiguration;

use super::{
    with_stem_extension, ArchiveInput, ArtifactKind, CompileInput, LinkInput, Toolchain,
    ToolchainPlatform,
};

/// GCC toolchain (Unix-like systems).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// C++ compiler and link driver
    pub cxx: String,
    /// Archiver
    pub ar: String,
}

impl GccToolchain {
    /// Create a GCC toolchain using `g++` and `ar` from PATH.
    pub fn new() -> Self {
        GccToolchain {
            cxx: "g++".to_string(),
            ar: "ar".to_string(),
        }
    }

    fn base_flags(&self) -> &'static str {
        "-Werror -std=c++20"
    }

    fn config_flags(&self, config: BuildConfiguration) -> &'static str {
        match config {
            BuildConfiguration::Debug => "-g -Og",
            BuildConfiguration::Release => "-g -O3",
            BuildConfiguration::Master => "-O3",
        }
    }

    fn warning_flags(&self, level: u8) -> &'static str {
        match level {
            0 => "-w",
            1 | 2 => "-Wall",
            3 => "-Wall -Wextra",
            _ => "-Wall -Wextra -Wpedantic",
        }
    }

    /// Dependency file written next to the object.
    pub fn depfile_path(&self, object: &std::path::Path) -> PathBuf {
        let dir = object.parent().unwrap_or_else(|| std::path::Path::new(""));
        with_stem_extension(dir, object, "d")
    }
}

impl Default for GccToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for GccToolchain {
    fn platform(&self) -> ToolchainPlatform {
        ToolchainPlatform::Gcc
    }

    fn rules(&self) -> Vec<Rule> {
        vec![
            Rule::new(
                "cc",
                format!(
                    "{} -MD $cc_out_deps -c $cc_flags $cc_build_flags $cc_warning_level \
                     $cc_defines $cc_out_obj $cc_in_includes $cc_in_files",
                    self.cxx
                ),
            )
            .with_depfile("$cc_depsfile")
            .with_deps("gcc"),
            Rule::new(
                "ar",
                format!("{} $ar_flags $ar_out_file $ar_in_files", self.ar),
            ),
            Rule::new(
                "ld",
                format!(
                    "{} $ld_build_flags $ld_out_exe $ld_in_lib_dirs $ld_in_files $ld_in_libs \
                     $ld_in_standard_libs",
                    self.cxx
                ),
            ),
        ]
    }

    fn compile_statement(
        &self,
        input: &CompileInput,
        config: BuildConfiguration,
    ) -> BuildStatement {
        let depfile = self.depfile_path(&input.object);

        BuildStatement::new(StatementKind::Compile, "cc")
            .output(&input.object)
            .input(&input.source)
            // Raw path for ninja, quoted flag for the shell
            .var("cc_depsfile", depfile.display().to_string())
            .var("cc_out_deps", quote_arg(&format!("-MF{}", depfile.display())))
            .var("cc_flags", self.base_flags())
            .var("cc_build_flags", self.config_flags(config))
            .var("cc_warning_level", self.warning_flags(input.warning_level))
            .var(
                "cc_defines",
                join_args(input.defines.iter().map(|d| format!("-D{}", d))),
            )
            .var("cc_out_obj", quote_arg(&format!("-o{}", input.object.display())))
            .var(
                "cc_in_includes",
                join_args(input.include_dirs.iter().map(|d| format!("-I{}", d.display()))),
            )
            .var("cc_in_files", quote_arg(&input.source.display().to_string()))
    }

    fn archive_statement(&self, input: &ArchiveInput) -> BuildStatement {
        BuildStatement::new(StatementKind::Archive, "ar")
            .output(&input.output)
            .inputs(input.objects.iter())
            // Create archive with symbol index, replace files
            .var("ar_flags", "rcs")
            .var("ar_out_file", quote_arg(&input.output.display().to_string()))
            .var(
                "ar_in_files",
                join_args(input.objects.iter().map(|o| o.display().to_string())),
            )
    }

    fn link_statement(&self, input: &LinkInput, config: BuildConfiguration) -> BuildStatement {
        // Static libraries resolve left to right: objects first, then
        // libraries in declared order, then system libraries.
        BuildStatement::new(StatementKind::Link, "ld")
            .output(&input.output)
            .inputs(input.objects.iter())
            .inputs(input.libraries.iter())
            .var("ld_build_flags", self.config_flags(config))
            .var("ld_out_exe", quote_arg(&format!("-o{}", input.output.display())))
            .var(
                "ld_in_lib_dirs",
                join_args(input.library_dirs.iter().map(|d| format!("-L{}", d.display()))),
            )
            .var(
                "ld_in_files",
                join_args(input.objects.iter().map(|o| o.display().to_string())),
            )
            .var(
                "ld_in_libs",
                join_args(input.libraries.iter().map(|l| l.display().to_string())),
            )
            .var(
                "ld_in_standard_libs",
                join_args(input.standard_libraries.iter().map(|l| format!("-l{}", l))),
            )
    }

    fn artifact_name(&self, kind: ArtifactKind, base: &str) -> String {
        match kind {
            ArtifactKind::StaticLibrary => format!("lib{}.a", base),
            ArtifactKind::Executable => base.to_string(),
        }
    }

    fn object_extension(&self) -> &str {
        "o"
    }
}
