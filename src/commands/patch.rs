//! Patch command implementation

use anyhow::Result;
use clap::Args;

use modlink::patch::PatchOrchestrator;

use crate::commands::Services;

/// Arguments for the patch command
#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Extra arguments forwarded to the build-system CLI
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub extra_args: Vec<String>,
}

/// Execute the patch command
pub fn execute(args: PatchArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let registry = services.registry();
    let orchestrator = PatchOrchestrator::new(&services.build, &registry, &services.options.project);
    let patch = orchestrator.create_patch(&args.extra_args)?;
    println!("Patch created: {}", patch.patch_url);
    Ok(())
}
