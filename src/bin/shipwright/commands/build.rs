//! `shipwright build` command

use anyhow::Result;

use super::Session;
use crate::cli::BuildArgs;
use shipwright::ops::{self, default_hook, GenerateOptions, NinjaExecutor, PipelineOptions};

pub fn execute(args: BuildArgs) -> Result<()> {
    let session = Session::load(&args.workspace)?;
    let config = session.build_type(args.build_type)?;

    // Emit compile commands: CLI flag OR config setting
    let emit_compile_commands =
        args.emit_compile_commands || session.config.build.emit_compile_commands;

    if args.plan {
        let mut opts = GenerateOptions::new(config);
        opts.plan_only = true;
        let generated = ops::generate(&session.ws, session.toolchain.as_ref(), &opts)?;
        println!("{}", serde_json::to_string_pretty(&generated.graph)?);
        return Ok(());
    }

    let opts = PipelineOptions {
        config,
        no_build: args.no_build,
        no_deploy: args.no_deploy,
        emit_compile_commands,
        // Jobs: CLI > config > None (ninja decides)
        jobs: args.jobs.or(session.config.build.jobs),
    };

    let executor = NinjaExecutor::new(session.config.build.ninja.clone());
    let hook = default_hook();

    let report = ops::run(
        &session.ws,
        session.toolchain.as_ref(),
        &opts,
        &executor,
        hook.as_ref(),
    )?;

    eprintln!(
        "   Generated {} ({} statements)",
        report.ninja_file.display(),
        report.statements
    );
    if report.built {
        eprintln!("    Finished {} build", config);
    }
    for project in &report.deployed {
        eprintln!("    Deployed {} data", project);
    }

    Ok(())
}
