//! `shipwright linkplan` command

use anyhow::{bail, Result};

use super::Session;
use crate::cli::LinkplanArgs;
use shipwright::builder::toolchain::library_path;
use shipwright::core::ProjectKind;

pub fn execute(args: LinkplanArgs) -> Result<()> {
    let session = Session::load(&args.workspace)?;
    let config = session.build_type(args.build_type)?;
    let platform = session.toolchain.platform();

    session.ws.validate(platform)?;
    let projects = session.ws.resolve(platform, config)?;

    let project = projects
        .iter()
        .find(|p| p.name == args.project)
        .ok_or_else(|| anyhow::anyhow!("project `{}` not found for {}", args.project, platform))?;

    let ProjectKind::Executable(spec) = &project.kind else {
        bail!(
            "project `{}` is a {}, not an executable",
            project.name,
            project.kind.as_str()
        );
    };

    println!("Link order for '{}' ({}, {}):", project.name, platform, config);
    println!();

    let mut index = 1;

    for name in &spec.libraries {
        let Some(lib) = projects.iter().find(|p| &p.name == name) else {
            continue;
        };
        if lib.is_header_only() {
            continue;
        }
        let path = library_path(session.toolchain.as_ref(), &lib.deploy_dir, &lib.name);
        println!("  {}. {}", index, path.display());
        println!("     Built from: {}", lib.name);
        println!();
        index += 1;
    }

    for lib in &spec.standard_libraries {
        println!("  {}. {}", index, lib);
        println!("     From: system");
        println!();
        index += 1;
    }

    if index == 1 {
        println!("  (nothing to link beyond the project's own objects)");
    }

    Ok(())
}
