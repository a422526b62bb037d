//! Test aggregation.
//!
//! Self-registering test cases compiled into a library are unreachable from
//! `main` and get dropped by the linker. The aggregator finds every test
//! source under a root and writes one umbrella translation unit that
//! `#include`s them all, so they are compiled straight into the test
//! executable instead.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::fs::{glob_files, relative_path, to_slash, write_string};

/// First line of every umbrella file.
pub const HEADER: &str = "/* auto-generated by shipwright: do not edit */";

/// Render the umbrella source for a sorted list of include paths.
pub fn render(includes: &[String]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str("\n\n");
    for include in includes {
        out.push_str(&format!("#include \"{}\"\n", include));
    }
    out
}

/// Discover test sources under `root` and write the umbrella file to `output`.
///
/// Include paths are relative to `root` with forward slashes, sorted, so the
/// umbrella file is byte-identical for an unchanged set of tests. The file is
/// rewritten on every call.
pub fn aggregate(root: &Path, pattern: &str, output: &Path) -> Result<PathBuf> {
    let files = glob_files(root, &[pattern.to_string()])
        .with_context(|| format!("failed to discover tests under {}", root.display()))?;

    let mut includes: Vec<String> = files
        .iter()
        .filter(|f| f.as_path() != output)
        .map(|f| to_slash(&relative_path(root, f)))
        .collect();
    includes.sort();
    includes.dedup();

    write_string(output, &render(&includes)).context("failed to write test umbrella")?;

    tracing::info!(
        "aggregated {} test sources into {}",
        includes.len(),
        output.display()
    );
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_aggregate_sorted_includes() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("bump");
        touch(&root, "net/socket.test.cpp");
        touch(&root, "math/vec.test.cpp");
        touch(&root, "math/vec.cpp");
        let output = tmp.path().join("test/test.cpp");

        let written = aggregate(&root, "**/*.test.cpp", &output).unwrap();
        assert_eq!(written, output);

        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(
            text,
            format!(
                "{}\n\n#include \"math/vec.test.cpp\"\n#include \"net/socket.test.cpp\"\n",
                HEADER
            )
        );
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("bump");
        touch(&root, "a.test.cpp");
        touch(&root, "sub/b.test.cpp");
        let output = tmp.path().join("test.cpp");

        aggregate(&root, "**/*.test.cpp", &output).unwrap();
        let first = fs::read(&output).unwrap();
        aggregate(&root, "**/*.test.cpp", &output).unwrap();
        let second = fs::read(&output).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_new_file_adds_one_line() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("bump");
        touch(&root, "a.test.cpp");
        let output = tmp.path().join("test.cpp");

        aggregate(&root, "**/*.test.cpp", &output).unwrap();
        let before: Vec<String> = fs::read_to_string(&output)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();

        touch(&root, "z/new.test.cpp");
        aggregate(&root, "**/*.test.cpp", &output).unwrap();
        let after: Vec<String> = fs::read_to_string(&output)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();

        assert_eq!(after.len(), before.len() + 1);
        let added: Vec<_> = after.iter().filter(|l| !before.contains(l)).collect();
        assert_eq!(added, vec!["#include \"z/new.test.cpp\""]);
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("game[1]/bump");
        touch(&root, "a.test.cpp");
        let output = tmp.path().join("game[1]/test/test.cpp");

        aggregate(&root, "**/*.test.cpp", &output).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            format!("{}\n\n#include \"a.test.cpp\"\n", HEADER)
        );
    }

    #[test]
    fn test_empty_root_writes_header_only() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("bump");
        fs::create_dir_all(&root).unwrap();
        let output = tmp.path().join("test.cpp");
        fs::write(&output, "stale").unwrap();

        aggregate(&root, "**/*.test.cpp", &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), format!("{}\n\n", HEADER));
    }
}
