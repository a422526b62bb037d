//! MSVC toolchain implementation.

use std::path::{Path, PathBuf};

use crate::builder::statement::{join_args, quote_arg, BuildStatement, Rule, StatementKind};
use crate::core::configuration::BuildConfiguration;

use super::{
    with_stem_extension, ArchiveInput, ArtifactKind, CompileInput, LinkInput, ResourceCompiler,
    ResourceInput, Toolchain, ToolchainPlatform,
};

/// MSVC toolchain (Windows).
#[derive(Debug, Clone)]
pub struct MsvcToolchain {
    /// Compiler
    pub cl: String,
    /// Librarian
    pub lib: String,
    /// Linker
    pub link: String,
    /// Resource compiler
    pub rc: String,
}

impl MsvcToolchain {
    /// Create an MSVC toolchain resolved from the developer prompt's PATH.
    pub fn new() -> Self {
        MsvcToolchain {
            cl: "cl.exe".to_string(),
            lib: "lib.exe".to_string(),
            link: "link.exe".to_string(),
            rc: "rc.exe".to_string(),
        }
    }

    fn config_flags(&self, config: BuildConfiguration) -> &'static str {
        match config {
            BuildConfiguration::Debug => "/MTd /Od /Zi",
            BuildConfiguration::Release => "/MT /Ox /Zi",
            BuildConfiguration::Master => "/MT /Ox",
        }
    }

    fn link_config_flags(&self, config: BuildConfiguration) -> &'static str {
        if config.has_debug_symbols() {
            "/DEBUG:FULL"
        } else {
            "/DEBUG:NONE"
        }
    }

    /// Per-object program database, next to the object.
    pub fn object_pdb_path(&self, object: &Path) -> PathBuf {
        let dir = object.parent().unwrap_or_else(|| Path::new(""));
        with_stem_extension(dir, object, "pdb")
    }

    /// Executable program database, next to the executable.
    pub fn exe_pdb_path(&self, exe: &Path) -> PathBuf {
        let dir = exe.parent().unwrap_or_else(|| Path::new(""));
        with_stem_extension(dir, exe, "pdb")
    }
}

impl Default for MsvcToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for MsvcToolchain {
    fn platform(&self) -> ToolchainPlatform {
        ToolchainPlatform::Msvc
    }

    fn rules(&self) -> Vec<Rule> {
        vec![
            Rule::new(
                "cc",
                format!(
                    "{} /showIncludes -c $cc_flags $cc_build_flags $cc_warning_level $cc_defines \
                     $cc_out_obj $cc_out_pdb $cc_in_includes $cc_in_files",
                    self.cl
                ),
            )
            .with_deps("msvc"),
            Rule::new(
                "ar",
                format!("{} $ar_flags $ar_out_file $ar_in_files", self.lib),
            ),
            Rule::new("rc", format!("{} $rc_out_file $rc_in_file", self.rc)),
            Rule::new(
                "link",
                format!(
                    "{} $link_flags $link_build_flags $link_out_exe $link_out_pdb \
                     $link_in_lib_dirs $link_in_files $res_file",
                    self.link
                ),
            ),
        ]
    }

    fn compile_statement(
        &self,
        input: &CompileInput,
        config: BuildConfiguration,
    ) -> BuildStatement {
        let mut stmt = BuildStatement::new(StatementKind::Compile, "cc").output(&input.object);

        // The compiler only writes a program database when symbols are on
        let pdb = if config.has_debug_symbols() {
            let pdb = self.object_pdb_path(&input.object);
            stmt = stmt.output(&pdb);
            quote_arg(&format!("/Fd{}", pdb.display()))
        } else {
            String::new()
        };

        stmt.input(&input.source)
            .var("cc_flags", "/nologo /Gy /EHsc /WX /std:c++latest /Zc:__cplusplus /utf-8")
            .var("cc_build_flags", self.config_flags(config))
            .var("cc_warning_level", format!("/W{}", input.warning_level))
            .var(
                "cc_defines",
                join_args(input.defines.iter().map(|d| format!("/D{}", d))),
            )
            .var("cc_out_obj", quote_arg(&format!("/Fo{}", input.object.display())))
            .var("cc_out_pdb", pdb)
            .var(
                "cc_in_includes",
                join_args(input.include_dirs.iter().map(|d| format!("/I{}", d.display()))),
            )
            .var("cc_in_files", quote_arg(&input.source.display().to_string()))
    }

    fn archive_statement(&self, input: &ArchiveInput) -> BuildStatement {
        BuildStatement::new(StatementKind::Archive, "ar")
            .output(&input.output)
            .inputs(input.objects.iter())
            .var("ar_flags", "/NOLOGO")
            .var("ar_out_file", quote_arg(&format!("/OUT:{}", input.output.display())))
            .var(
                "ar_in_files",
                join_args(input.objects.iter().map(|o| o.display().to_string())),
            )
    }

    fn link_statement(&self, input: &LinkInput, config: BuildConfiguration) -> BuildStatement {
        let mut stmt = BuildStatement::new(StatementKind::Link, "link").output(&input.output);

        let pdb = if config.has_debug_symbols() {
            let pdb = self.exe_pdb_path(&input.output);
            stmt = stmt.output(&pdb);
            quote_arg(&format!("/PDB:{}", pdb.display()))
        } else {
            String::new()
        };

        stmt = stmt
            .inputs(input.objects.iter())
            .inputs(input.libraries.iter());
        if let Some(res) = &input.resource {
            stmt = stmt.input(res);
        }

        // Objects, then library artifacts, then system libraries
        let files = input
            .objects
            .iter()
            .chain(input.libraries.iter())
            .map(|p| p.display().to_string())
            .chain(input.standard_libraries.iter().cloned());

        stmt.var("link_flags", "/NOLOGO /OPT:REF /SUBSYSTEM:CONSOLE")
            .var("link_build_flags", self.link_config_flags(config))
            .var("link_out_exe", quote_arg(&format!("/OUT:{}", input.output.display())))
            .var("link_out_pdb", pdb)
            .var(
                "link_in_lib_dirs",
                join_args(
                    input
                        .library_dirs
                        .iter()
                        .map(|d| format!("/LIBPATH:{}", d.display())),
                ),
            )
            .var("link_in_files", join_args(files))
            .var(
                "res_file",
                input
                    .resource
                    .as_ref()
                    .map(|r| quote_arg(&r.display().to_string()))
                    .unwrap_or_default(),
            )
    }

    fn resource_compiler(&self) -> Option<&dyn ResourceCompiler> {
        Some(self)
    }

    fn artifact_name(&self, kind: ArtifactKind, base: &str) -> String {
        match kind {
            ArtifactKind::StaticLibrary => format!("{}.lib", base),
            ArtifactKind::Executable => format!("{}.exe", base),
        }
    }

    fn object_extension(&self) -> &str {
        "obj"
    }
}

impl ResourceCompiler for MsvcToolchain {
    fn resource_statement(&self, input: &ResourceInput) -> BuildStatement {
        BuildStatement::new(StatementKind::Resource, "rc")
            .output(&input.output)
            .input(&input.source)
            .var("rc_out_file", format!("/fo {}", quote_arg(&input.output.display().to_string())))
            .var("rc_in_file", quote_arg(&input.source.display().to_string()))
    }

    fn resource_extension(&self) -> &str {
        "res"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::Define;

    fn compile_input() -> CompileInput {
        CompileInput {
            source: PathBuf::from("Code/rog/main.cpp"),
            object: PathBuf::from("Build/rog/main.obj"),
            include_dirs: vec![PathBuf::from("Code/glm")],
            defines: vec![Define::flag("UNICODE")],
            warning_level: 4,
        }
    }

    fn link_input() -> LinkInput {
        LinkInput {
            objects: vec![PathBuf::from("Build/rog/main.obj")],
            libraries: vec![PathBuf::from("Deploy/bump/bump.lib")],
            standard_libraries: vec!["user32.lib".into()],
            library_dirs: vec![],
            output: PathBuf::from("Deploy/rog/rog.exe"),
            resource: Some(PathBuf::from("Build/rog/rog.res")),
        }
    }

    #[test]
    fn test_compile_debug_declares_pdb() {
        let msvc = MsvcToolchain::new();
        let stmt = msvc.compile_statement(&compile_input(), BuildConfiguration::Debug);

        assert_eq!(
            stmt.outputs,
            vec![PathBuf::from("Build/rog/main.obj"), PathBuf::from("Build/rog/main.pdb")]
        );
        assert_eq!(stmt.variable("cc_build_flags"), Some("/MTd /Od /Zi"));
        assert_eq!(stmt.variable("cc_warning_level"), Some("/W4"));
        assert_eq!(stmt.variable("cc_defines"), Some("/DUNICODE"));
        assert_eq!(stmt.variable("cc_out_pdb"), Some("/FdBuild/rog/main.pdb"));
        assert_eq!(stmt.variable("cc_in_includes"), Some("/ICode/glm"));
    }

    #[test]
    fn test_compile_master_has_no_pdb() {
        let msvc = MsvcToolchain::new();
        let stmt = msvc.compile_statement(&compile_input(), BuildConfiguration::Master);

        assert_eq!(stmt.outputs, vec![PathBuf::from("Build/rog/main.obj")]);
        assert_eq!(stmt.variable("cc_build_flags"), Some("/MT /Ox"));
        assert_eq!(stmt.variable("cc_out_pdb"), Some(""));
    }

    #[test]
    fn test_link_release() {
        let msvc = MsvcToolchain::new();
        let stmt = msvc.link_statement(&link_input(), BuildConfiguration::Release);

        assert_eq!(
            stmt.outputs,
            vec![PathBuf::from("Deploy/rog/rog.exe"), PathBuf::from("Deploy/rog/rog.pdb")]
        );
        assert_eq!(stmt.variable("link_build_flags"), Some("/DEBUG:FULL"));
        assert_eq!(
            stmt.variable("link_in_files"),
            Some("Build/rog/main.obj Deploy/bump/bump.lib user32.lib")
        );
        assert_eq!(stmt.variable("res_file"), Some("Build/rog/rog.res"));
        assert!(stmt.inputs.contains(&PathBuf::from("Build/rog/rog.res")));
    }

    #[test]
    fn test_link_master() {
        let msvc = MsvcToolchain::new();
        let stmt = msvc.link_statement(&link_input(), BuildConfiguration::Master);

        assert_eq!(stmt.outputs, vec![PathBuf::from("Deploy/rog/rog.exe")]);
        assert_eq!(stmt.variable("link_build_flags"), Some("/DEBUG:NONE"));
    }

    #[test]
    fn test_resource_statement() {
        let msvc = MsvcToolchain::new();
        let rc = msvc.resource_compiler().unwrap();
        let stmt = rc.resource_statement(&ResourceInput {
            source: PathBuf::from("Code/rog/rog.rc"),
            output: PathBuf::from("Build/rog/rog.res"),
        });

        assert_eq!(stmt.kind, StatementKind::Resource);
        assert_eq!(stmt.variable("rc_out_file"), Some("/fo Build/rog/rog.res"));
        assert_eq!(stmt.variable("rc_in_file"), Some("Code/rog/rog.rc"));
        assert_eq!(rc.resource_extension(), "res");
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        let msvc = MsvcToolchain::new();
        let compile = msvc.compile_statement(
            &CompileInput {
                source: PathBuf::from("Code/my app/main.cpp"),
                object: PathBuf::from("Build/my app/main.obj"),
                include_dirs: vec![PathBuf::from("Code/my app/inc")],
                defines: vec![],
                warning_level: 4,
            },
            BuildConfiguration::Debug,
        );
        assert_eq!(compile.variable("cc_in_files"), Some("\"Code/my app/main.cpp\""));
        assert_eq!(compile.variable("cc_out_obj"), Some("\"/FoBuild/my app/main.obj\""));
        assert_eq!(compile.variable("cc_out_pdb"), Some("\"/FdBuild/my app/main.pdb\""));
        assert_eq!(compile.variable("cc_in_includes"), Some("\"/ICode/my app/inc\""));

        let archive = msvc.archive_statement(&ArchiveInput {
            objects: vec![PathBuf::from("Build/my app/a.obj")],
            output: PathBuf::from("Deploy/my app/x.lib"),
        });
        let rules = msvc.rules();
        let ar = rules.iter().find(|r| r.name == "ar").unwrap();
        assert_eq!(
            archive.expand_command(ar),
            "lib.exe /NOLOGO \"/OUT:Deploy/my app/x.lib\" \"Build/my app/a.obj\""
        );
    }

    #[test]
    fn test_archive_statement() {
        let msvc = MsvcToolchain::new();
        let stmt = msvc.archive_statement(&ArchiveInput {
            objects: vec![PathBuf::from("a.obj"), PathBuf::from("b.obj")],
            output: PathBuf::from("bump.lib"),
        });
        let rules = msvc.rules();
        let ar = rules.iter().find(|r| r.name == "ar").unwrap();
        assert_eq!(stmt.expand_command(ar), "lib.exe /NOLOGO /OUT:bump.lib a.obj b.obj");
    }
}
