//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Find files matching glob patterns relative to a base directory.
///
/// Metacharacters in `base` itself match literally. The result is sorted
/// with [`sort_paths`] and deduplicated.
pub fn glob_files(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    let escaped_base = PathBuf::from(Pattern::escape(&base.to_string_lossy()));

    for pattern in patterns {
        let full_pattern = escaped_base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in
            glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        results.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    sort_paths(&mut results);
    Ok(results)
}

/// Sort paths lexicographically by their `/`-separated text and drop
/// duplicates.
pub fn sort_paths(paths: &mut Vec<PathBuf>) {
    paths.sort_by_cached_key(|p| p.to_string_lossy().replace('\\', "/"));
    paths.dedup();
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Render a path with `/` separators regardless of host.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// What a mirror pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub copied: usize,
    pub removed: usize,
}

/// Make `dst` an exact copy of `src`.
///
/// Files missing from `dst` or differing in size or modification time are
/// copied; anything in `dst` with no counterpart in `src` is deleted.
pub fn mirror_dir(src: &Path, dst: &Path) -> Result<MirrorStats> {
    let mut stats = MirrorStats::default();
    ensure_dir(dst)?;

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        let rel = relative_path(src, entry.path());
        let target = dst.join(&rel);

        if entry.file_type().is_dir() {
            if target.is_file() {
                fs::remove_file(&target)
                    .with_context(|| format!("failed to remove {}", target.display()))?;
                stats.removed += 1;
            }
            ensure_dir(&target)?;
        } else if needs_copy(entry.path(), &target)? {
            if target.is_dir() {
                fs::remove_dir_all(&target)
                    .with_context(|| format!("failed to remove {}", target.display()))?;
                stats.removed += 1;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            stats.copied += 1;
        }
    }

    // Depth-first so a directory is visited after its contents
    let extraneous: Vec<PathBuf> = WalkDir::new(dst)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| !src.join(relative_path(dst, p)).exists())
        .collect();

    for path in extraneous {
        if !path.exists() {
            continue;
        }
        if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        }
        .with_context(|| format!("failed to remove {}", path.display()))?;
        stats.removed += 1;
    }

    Ok(stats)
}

fn needs_copy(src: &Path, dst: &Path) -> Result<bool> {
    let Ok(theirs) = fs::metadata(dst) else {
        return Ok(true);
    };
    let ours =
        fs::metadata(src).with_context(|| format!("failed to stat {}", src.display()))?;
    if !theirs.is_file() || ours.len() != theirs.len() {
        return Ok(true);
    }
    Ok(match (ours.modified(), theirs.modified()) {
        (Ok(a), Ok(b)) => a > b,
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("main.cpp"), "int main() {}").unwrap();
        fs::write(src.join("util.c"), "void util() {}").unwrap();
        fs::write(src.join("readme.txt"), "readme").unwrap();

        let files = glob_files(
            tmp.path(),
            &["src/**/*.cpp".to_string(), "src/**/*.c".to_string()],
        )
        .unwrap();
        assert_eq!(files, vec![src.join("main.cpp"), src.join("util.c")]);
    }

    #[test]
    fn test_glob_overlapping_patterns_dedup() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.cpp"), "").unwrap();

        let files = glob_files(tmp.path(), &["*.cpp".to_string(), "**/*.cpp".to_string()]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_glob_base_with_metacharacters() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("game[1]");
        fs::create_dir_all(base.join("net")).unwrap();
        fs::write(base.join("net/socket.cpp"), "").unwrap();

        let files = glob_files(&base, &["**/*.cpp".to_string()]).unwrap();
        assert_eq!(files, vec![base.join("net/socket.cpp")]);
    }

    #[test]
    fn test_sort_paths_is_textual() {
        let mut paths = vec![
            PathBuf::from("a/b.cpp"),
            PathBuf::from("a-b.cpp"),
            PathBuf::from("a/b.cpp"),
        ];
        sort_paths(&mut paths);
        // '-' sorts before '/' as text, unlike a component-wise sort
        assert_eq!(paths, vec![PathBuf::from("a-b.cpp"), PathBuf::from("a/b.cpp")]);
    }

    #[test]
    fn test_to_slash() {
        let path: PathBuf = ["net", "socket.test.cpp"].iter().collect();
        assert_eq!(to_slash(&path), "net/socket.test.cpp");
    }

    #[test]
    fn test_mirror_dir() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("Data");
        let dst = tmp.path().join("Deploy/data");

        fs::create_dir_all(src.join("textures")).unwrap();
        fs::write(src.join("config.json"), "{}").unwrap();
        fs::write(src.join("textures/wall.png"), "png").unwrap();

        fs::create_dir_all(dst.join("old")).unwrap();
        fs::write(dst.join("old/stale.bin"), "x").unwrap();
        fs::write(dst.join("leftover.txt"), "x").unwrap();

        let stats = mirror_dir(&src, &dst).unwrap();
        assert_eq!(stats.copied, 2);
        assert!(dst.join("config.json").is_file());
        assert!(dst.join("textures/wall.png").is_file());
        assert!(!dst.join("old").exists());
        assert!(!dst.join("leftover.txt").exists());

        // Second pass has nothing to do
        let stats = mirror_dir(&src, &dst).unwrap();
        assert_eq!(stats, MirrorStats::default());
    }
}
