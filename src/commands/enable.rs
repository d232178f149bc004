//! Enable command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::{with_lifecycle, Services};

/// Arguments for the enable command
#[derive(Args, Debug)]
pub struct EnableArgs {
    /// Name of the module to enable
    #[arg(short, long, value_name = "MODULE")]
    pub module: String,

    /// Do not sync the module to its manifest-pinned revision
    #[arg(long)]
    pub no_sync: bool,
}

/// Execute the enable command
pub fn execute(args: EnableArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let module = with_lifecycle(services, |lifecycle| {
        Ok(lifecycle.enable(&args.module, !args.no_sync)?)
    })?;
    println!(
        "Module '{}' enabled at {}",
        module.name,
        module.location().display()
    );
    Ok(())
}
