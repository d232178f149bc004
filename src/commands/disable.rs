//! Disable command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::{with_lifecycle, Services};

/// Arguments for the disable command
#[derive(Args, Debug)]
pub struct DisableArgs {
    /// Name of the module to disable
    #[arg(short, long, value_name = "MODULE")]
    pub module: String,
}

/// Execute the disable command
pub fn execute(args: DisableArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let module = with_lifecycle(services, |lifecycle| Ok(lifecycle.disable(&args.module)?))?;
    println!("Module '{}' disabled", module.name);
    Ok(())
}
