//! Branch command implementation
//!
//! Branch operations fan out over the base repo and every enabled module so
//! the whole working set moves together. Creation aborts on the first
//! failure; the other operations report per-repository outcomes.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::commands::{report_fan_out, with_multi_git, Services};

/// Arguments for the branch command
#[derive(Args, Debug)]
pub struct BranchArgs {
    #[command(subcommand)]
    pub command: BranchCommand,
}

#[derive(Subcommand, Debug)]
pub enum BranchCommand {
    /// Create a branch in every repository
    Create {
        /// Name of the branch to create
        #[arg(short, long, value_name = "NAME")]
        branch: String,

        /// Revision to base the branch off
        #[arg(short, long, value_name = "REVISION", default_value = "HEAD")]
        revision: String,
    },
    /// Show the branches of every repository
    Show,
    /// Check out an existing branch in every repository
    Switch {
        /// Name of the branch to switch to
        #[arg(short, long, value_name = "NAME")]
        branch: String,
    },
    /// Delete a branch in every repository
    Delete {
        /// Name of the branch to delete
        #[arg(short, long, value_name = "NAME")]
        branch: String,
    },
    /// Update the current branch from an upstream branch, syncing modules
    Update {
        /// Upstream branch to update from
        #[arg(short, long, value_name = "BRANCH")]
        branch: String,

        /// Rebase local commits instead of merging
        #[arg(long)]
        rebase: bool,
    },
}

/// Execute the branch command
pub fn execute(args: BranchArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    match args.command {
        BranchCommand::Create { branch, revision } => {
            let created =
                with_multi_git(services, |git| Ok(git.create_branch(&branch, &revision)?))?;
            println!("Branch '{}' created in:", branch);
            for name in created {
                println!(" - {}", name);
            }
            Ok(())
        }
        BranchCommand::Show => {
            let (outputs, errors) = with_multi_git(services, |git| Ok(git.list_branches()?))?;
            report_fan_out(&services.output, &outputs, &errors)
        }
        BranchCommand::Switch { branch } => {
            let (outputs, errors) =
                with_multi_git(services, |git| Ok(git.switch_branch(&branch)?))?;
            report_fan_out(&services.output, &outputs, &errors)
        }
        BranchCommand::Delete { branch } => {
            let (outputs, errors) =
                with_multi_git(services, |git| Ok(git.delete_branch(&branch)?))?;
            report_fan_out(&services.output, &outputs, &errors)
        }
        BranchCommand::Update { branch, rebase } => {
            let synced = with_multi_git(services, |git| {
                Ok(git.update_current_branch(&branch, rebase)?)
            })?;
            for (module, revision) in synced {
                println!("Synced {} to {}", module, revision);
            }
            Ok(())
        }
    }
}
