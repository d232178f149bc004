//! Restore command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::{report_fan_out, with_multi_git, Services};

/// Arguments for the restore command
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Unstage the files instead of discarding working tree changes
    #[arg(long)]
    pub staged: bool,

    /// Pathspecs to restore, resolved per repository
    #[arg(required = true, value_name = "PATHSPEC")]
    pub pathspecs: Vec<String>,
}

/// Execute the restore command
pub fn execute(args: RestoreArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let (outputs, errors) =
        with_multi_git(services, |git| Ok(git.restore(&args.pathspecs, args.staged)?))?;
    report_fan_out(&services.output, &outputs, &errors)
}
