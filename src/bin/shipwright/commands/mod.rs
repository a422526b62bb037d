//! Command implementations

pub mod build;
pub mod completions;
pub mod linkplan;
pub mod toolchain;

use anyhow::Result;

use crate::cli::WorkspaceArgs;
use shipwright::builder::{select_toolchain, Toolchain};
use shipwright::core::{BuildConfiguration, Workspace};
use shipwright::util::{Config, GlobalContext};

/// A loaded workspace with its layered config and active toolchain.
pub struct Session {
    pub ws: Workspace,
    pub config: Config,
    pub toolchain: Box<dyn Toolchain>,
}

impl Session {
    pub fn load(args: &WorkspaceArgs) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        let manifest_path = ctx.find_manifest(args.manifest.as_deref())?;
        let ws = Workspace::new(&manifest_path)?;
        let config = ctx.config(ws.root());

        // --toolchain > [toolchain] platform > host
        let platform = args.toolchain.or(config.toolchain.platform);
        let toolchain = select_toolchain(platform)?;

        Ok(Session {
            ws,
            config,
            toolchain,
        })
    }

    /// CLI value, then `[build] build-type`. One of them must be given.
    pub fn build_type(&self, cli: Option<BuildConfiguration>) -> Result<BuildConfiguration> {
        cli.or(self.config.build.build_type).ok_or_else(|| {
            anyhow::anyhow!(
                "no build type selected\n\
                 help: pass --build-type <debug|release|master> or set `build-type` under \
                 [build] in .shipwright/config.toml"
            )
        })
    }
}
