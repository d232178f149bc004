//! Commit command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::{with_multi_git, Services};

/// Arguments for the commit command
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Commit message
    #[arg(
        short,
        long,
        value_name = "MESSAGE",
        required_unless_present = "amend"
    )]
    pub message: Option<String>,

    /// Amend the previous commit, reusing its message
    #[arg(long)]
    pub amend: bool,

    /// Include changes to any tracked file in the module commits
    #[arg(short = 'a', long)]
    pub add: bool,
}

/// Execute the commit command
pub fn execute(args: CommitArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let committed = with_multi_git(services, |git| {
        Ok(git.commit_all(args.message.as_deref(), args.amend, args.add)?)
    })?;
    let action = if args.amend { "amended" } else { "created" };
    println!("Commit {} in:", action);
    for name in committed {
        println!(" - {}", name);
    }
    Ok(())
}
