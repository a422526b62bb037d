//! Toolchain selection.

use crate::core::error::ModelError;

use super::{GccToolchain, MsvcToolchain, Toolchain, ToolchainPlatform};

/// Map an operating system name (as in `std::env::consts::OS`) to its toolchain.
pub fn platform_for_os(os: &str) -> Result<ToolchainPlatform, ModelError> {
    match os {
        "windows" => Ok(ToolchainPlatform::Msvc),
        "linux" => Ok(ToolchainPlatform::Gcc),
        other => Err(ModelError::UnsupportedPlatform {
            os: other.to_string(),
        }),
    }
}

/// Toolchain for the host operating system.
pub fn detect_platform() -> Result<ToolchainPlatform, ModelError> {
    platform_for_os(std::env::consts::OS)
}

/// Instantiate a toolchain.
pub fn toolchain_for(platform: ToolchainPlatform) -> Box<dyn Toolchain> {
    match platform {
        ToolchainPlatform::Msvc => Box::new(MsvcToolchain::new()),
        ToolchainPlatform::Gcc => Box::new(GccToolchain::new()),
    }
}

/// Select the active toolchain.
///
/// An explicit platform wins; otherwise the host decides. Hosts other than
/// Windows and Linux have no default and must name a toolchain.
pub fn select_toolchain(
    explicit: Option<ToolchainPlatform>,
) -> Result<Box<dyn Toolchain>, ModelError> {
    let platform = match explicit {
        Some(platform) => platform,
        None => detect_platform()?,
    };
    tracing::debug!("using {} toolchain", platform);
    Ok(toolchain_for(platform))
}
