//! `shipwright toolchain` command

use anyhow::Result;

use crate::cli::ToolchainArgs;
use shipwright::builder::toolchain::{ArtifactKind, Toolchain};
use shipwright::builder::{select_toolchain, GccToolchain, MsvcToolchain, ToolchainPlatform};
use shipwright::util::process::{find_executable, tool_version};
use shipwright::util::GlobalContext;

pub fn execute(args: ToolchainArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    // Outside a workspace only the global config applies
    let configured = ctx
        .find_manifest(None)
        .ok()
        .and_then(|m| m.parent().map(|root| ctx.config(root)))
        .and_then(|config| config.toolchain.platform);

    let toolchain = select_toolchain(args.toolchain.or(configured))?;
    let platform = toolchain.platform();

    println!("Toolchain: {}", platform);
    println!();

    let tools: Vec<(&str, String)> = match platform {
        ToolchainPlatform::Msvc => {
            let tc = MsvcToolchain::new();
            vec![("CL", tc.cl), ("LIB", tc.lib), ("LINK", tc.link), ("RC", tc.rc)]
        }
        ToolchainPlatform::Gcc => {
            let tc = GccToolchain::new();
            vec![("CXX", tc.cxx), ("AR", tc.ar)]
        }
    };

    for (label, program) in &tools {
        match find_executable(program) {
            Some(path) => {
                println!("  {:<6}{}", format!("{}:", label), path.display());
                if let Some(version) = tool_version(&path) {
                    println!("        {}", version);
                }
            }
            None => println!("  {:<6}{} (not found)", format!("{}:", label), program),
        }
    }

    println!();
    print_naming(toolchain.as_ref());

    Ok(())
}

fn print_naming(toolchain: &dyn Toolchain) {
    println!("Artifacts:");
    println!(
        "  Static library: {}",
        toolchain.artifact_name(ArtifactKind::StaticLibrary, "<name>")
    );
    println!(
        "  Executable:     {}",
        toolchain.artifact_name(ArtifactKind::Executable, "<name>")
    );
    println!("  Object:         <source>.{}", toolchain.object_extension());
    println!(
        "  Resources:      {}",
        if toolchain.resource_compiler().is_some() {
            "supported"
        } else {
            "not supported"
        }
    );
}
