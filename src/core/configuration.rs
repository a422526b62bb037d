//! Build configurations.
//!
//! A configuration is picked once per run and selects optimization level,
//! debug-symbol policy and runtime-library linkage for every toolchain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The build configuration for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfiguration {
    /// Unoptimized, full debug info
    Debug,
    /// Optimized, full debug info
    Release,
    /// Optimized, no debug info (shipping build)
    Master,
}

impl BuildConfiguration {
    /// All configurations, in declaration order.
    pub const ALL: [BuildConfiguration; 3] = [
        BuildConfiguration::Debug,
        BuildConfiguration::Release,
        BuildConfiguration::Master,
    ];

    /// Lowercase name as used on the command line and in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "debug",
            BuildConfiguration::Release => "release",
            BuildConfiguration::Master => "master",
        }
    }

    /// Capitalized name used in the build and deploy directory layout.
    pub fn dir_name(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "Debug",
            BuildConfiguration::Release => "Release",
            BuildConfiguration::Master => "Master",
        }
    }

    /// Whether this configuration produces debug-symbol artifacts.
    pub fn has_debug_symbols(&self) -> bool {
        !matches!(self, BuildConfiguration::Master)
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildConfiguration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildConfiguration::Debug),
            "release" => Ok(BuildConfiguration::Release),
            "master" => Ok(BuildConfiguration::Master),
            _ => Err(format!(
                "invalid build type '{}'; expected 'debug', 'release', or 'master'",
                s
            )),
        }
    }
}
