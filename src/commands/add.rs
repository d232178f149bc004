//! Add command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::{report_fan_out, with_multi_git, Services};

/// Arguments for the add command
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Pathspecs to stage, resolved per repository
    #[arg(required = true, value_name = "PATHSPEC")]
    pub pathspecs: Vec<String>,
}

/// Execute the add command
pub fn execute(args: AddArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let (outputs, errors) = with_multi_git(services, |git| Ok(git.add(&args.pathspecs)?))?;
    report_fan_out(&services.output, &outputs, &errors)
}
