//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use shipwright::builder::ToolchainPlatform;
use shipwright::core::BuildConfiguration;

/// Shipwright - ninja build-description generator for C/C++ trees
#[derive(Parser)]
#[command(name = "shipwright")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the build description, run ninja and deploy data
    Build(BuildArgs),

    /// Show the link inputs of an executable, in order
    Linkplan(LinkplanArgs),

    /// Show the selected toolchain
    Toolchain(ToolchainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that read the manifest.
#[derive(Args)]
pub struct WorkspaceArgs {
    /// Path to Shipwright.toml (default: search upward from the current directory)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Toolchain to generate for (default: detected from the host)
    #[arg(long, value_parser = parse_platform)]
    pub toolchain: Option<ToolchainPlatform>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build configuration (required unless `[build] build-type` is configured)
    #[arg(long, value_parser = parse_configuration)]
    pub build_type: Option<BuildConfiguration>,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Generate the build description only
    #[arg(long)]
    pub no_build: bool,

    /// Skip data deployment after a successful build
    #[arg(long)]
    pub no_deploy: bool,

    /// Emit compile_commands.json
    #[arg(long)]
    pub emit_compile_commands: bool,

    /// Print the build graph as JSON (no files written, no build)
    #[arg(long)]
    pub plan: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct LinkplanArgs {
    /// Executable project name
    pub project: String,

    /// Build configuration (required unless `[build] build-type` is configured)
    #[arg(long, value_parser = parse_configuration)]
    pub build_type: Option<BuildConfiguration>,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

#[derive(Args)]
pub struct ToolchainArgs {
    /// Toolchain to describe (default: detected from the host)
    #[arg(long, value_parser = parse_platform)]
    pub toolchain: Option<ToolchainPlatform>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

fn parse_configuration(s: &str) -> Result<BuildConfiguration, String> {
    s.parse()
}

fn parse_platform(s: &str) -> Result<ToolchainPlatform, String> {
    s.parse().map_err(|e: shipwright::ModelError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "shipwright",
            "build",
            "--build-type",
            "release",
            "--toolchain",
            "gcc",
            "--no-build",
            "-j",
            "4",
        ])
        .unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.build_type, Some(BuildConfiguration::Release));
        assert_eq!(args.workspace.toolchain, Some(ToolchainPlatform::Gcc));
        assert!(args.no_build);
        assert_eq!(args.jobs, Some(4));
    }

    #[test]
    fn test_rejects_unknown_build_type() {
        assert!(Cli::try_parse_from(["shipwright", "build", "--build-type", "fast"]).is_err());
    }
}
