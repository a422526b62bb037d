//! Configuration file support for Shipwright.
//!
//! Shipwright supports two configuration file locations:
//! - Global: `~/.shipwright/config.toml` - User-wide defaults
//! - Project: `.shipwright/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::toolchain::ToolchainPlatform;
use crate::core::configuration::BuildConfiguration;

/// Shipwright configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Toolchain settings
    pub toolchain: ToolchainConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Path to the ninja executable (default: found on PATH)
    pub ninja: Option<PathBuf>,

    /// Parallel jobs passed to ninja as `-j`
    pub jobs: Option<usize>,

    /// Write compile_commands.json on every generation
    pub emit_compile_commands: bool,

    /// Configuration used when `--build-type` is not given
    pub build_type: Option<BuildConfiguration>,
}

/// Toolchain selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Force a toolchain instead of detecting it from the host
    pub platform: Option<ToolchainPlatform>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.ninja.is_some() {
            self.build.ninja = other.build.ninja;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.emit_compile_commands {
            self.build.emit_compile_commands = true;
        }
        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.toolchain.platform.is_some() {
            self.toolchain.platform = other.toolchain.platform;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.shipwright/config.toml)
/// 2. Global config (~/.shipwright/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global shipwright config directory (~/.shipwright).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".shipwright"))
}

/// Get the global config path (~/.shipwright/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.shipwright/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".shipwright").join("config.toml")
}
