//! Status command implementation

use anyhow::Result;
use clap::Args;

use modlink::model::GitCommandOutput;

use crate::commands::{report_fan_out, with_multi_git, Services};

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Execute the status command
pub fn execute(_args: StatusArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let (outputs, errors) = with_multi_git(services, |git| Ok(git.status()?))?;
    let colorized: Vec<GitCommandOutput> = outputs
        .into_iter()
        .map(|o| GitCommandOutput::new(o.repo_name, services.output.colorize_status(&o.output)))
        .collect();
    report_fan_out(&services.output, &colorized, &errors)
}
