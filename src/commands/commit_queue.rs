//! Commit-queue command implementation

use anyhow::Result;
use clap::Args;

use modlink::patch::PatchOrchestrator;

use crate::commands::Services;

/// Arguments for the commit-queue command
#[derive(Args, Debug)]
pub struct CommitQueueArgs {
    /// Extra arguments forwarded to the build-system CLI
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub extra_args: Vec<String>,
}

/// Execute the commit-queue command
pub fn execute(args: CommitQueueArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let registry = services.registry();
    let orchestrator = PatchOrchestrator::new(&services.build, &registry, &services.options.project);
    let patch = orchestrator.create_cq_patch(&args.extra_args)?;
    println!("Commit-queue entry created: {}", patch.patch_url);
    Ok(())
}
