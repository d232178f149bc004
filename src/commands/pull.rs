//! Pull command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::{with_multi_git, Services};

/// Arguments for the pull command
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Rebase local commits instead of merging
    #[arg(long)]
    pub rebase: bool,
}

/// Execute the pull command
pub fn execute(args: PullArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let synced = with_multi_git(services, |git| Ok(git.pull(args.rebase)?))?;
    println!("Base: pulled to latest");
    for (module, revision) in synced {
        println!(" - {}: {}", module, revision);
    }
    Ok(())
}
