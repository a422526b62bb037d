//! Compilation database (`compile_commands.json`) for IDE integration.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::builder::statement::StatementKind;
use crate::builder::writer::BuildGraph;
use crate::util::fs::write_string;

/// File name written at the workspace root.
pub const COMPDB_NAME: &str = "compile_commands.json";

/// compile_commands.json entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// One entry per compile statement, with the command fully expanded.
///
/// `directory` is the directory the executor runs in, since every path in
/// the build description is relative to it.
pub fn compile_commands(graph: &BuildGraph, directory: &Path) -> Vec<CompileCommand> {
    graph
        .statements()
        .filter(|s| s.kind == StatementKind::Compile)
        .filter_map(|stmt| {
            let rule = graph.rule(&stmt.rule)?;
            let file = stmt.inputs.first()?;
            Some(CompileCommand {
                directory: directory.display().to_string(),
                file: file.display().to_string(),
                command: stmt.expand_command(rule),
                output: stmt.outputs.first().map(|o| o.display().to_string()),
            })
        })
        .collect()
}

/// Write the compilation database to `path`.
pub fn emit_compile_commands(graph: &BuildGraph, directory: &Path, path: &Path) -> Result<usize> {
    let commands = compile_commands(graph, directory);
    let json = serde_json::to_string_pretty(&commands)?;
    write_string(path, &json)?;
    Ok(commands.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::GccToolchain;
    use crate::builder::writer::generate;
    use crate::core::configuration::BuildConfiguration;
    use crate::test_support::{executable, static_lib};

    #[test]
    fn test_one_entry_per_compile() {
        let projects = vec![
            static_lib("core", &["a.cpp", "b.cpp"]),
            executable("app", &["main.cpp"], &["core"]),
        ];
        let graph = generate(&projects, &GccToolchain::new(), BuildConfiguration::Debug).unwrap();

        let commands = compile_commands(&graph, Path::new("/work"));
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].file, "Code/core/a.cpp");
        assert_eq!(commands[0].output.as_deref(), Some("Build/core/a.o"));
        assert_eq!(commands[0].directory, "/work");
        assert!(commands[0].command.starts_with("g++ -MD -MFBuild/core/a.d -c -Werror -std=c++20 -g -Og"));
        assert!(commands[0].command.ends_with("Code/core/a.cpp"));
    }

    #[test]
    fn test_emit_writes_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let projects = vec![static_lib("core", &["a.cpp"])];
        let graph = generate(&projects, &GccToolchain::new(), BuildConfiguration::Master).unwrap();

        let path = tmp.path().join(COMPDB_NAME);
        let count = emit_compile_commands(&graph, tmp.path(), &path).unwrap();
        assert_eq!(count, 1);

        let parsed: Vec<CompileCommand> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, compile_commands(&graph, tmp.path()));
    }
}
