//! Pull request command implementation

use anyhow::Result;
use clap::Args;

use modlink::pull_requests::PullRequestOrchestrator;

use crate::commands::Services;

/// Arguments for the pr command
#[derive(Args, Debug)]
pub struct PrArgs {
    /// Title for the pull requests; defaults to the latest commit subject
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Body for the pull requests
    #[arg(long, value_name = "BODY")]
    pub body: Option<String>,

    /// Remote to push to, by name or URL fragment
    #[arg(long, value_name = "REMOTE")]
    pub remote: Option<String>,
}

/// Execute the pr command
pub fn execute(args: PrArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    services.validation().validate_code_host()?;

    let registry = services.registry();
    let orchestrator = PullRequestOrchestrator::new(&services.vcs, &registry, &services.host);
    let records = orchestrator.create_pull_requests(
        args.title.as_deref(),
        args.body.as_deref(),
        args.remote.as_deref(),
    )?;

    if records.is_empty() {
        println!("No repository differs from its target branch; nothing to create");
        return Ok(());
    }
    for record in records {
        println!("{}: {}", record.name, record.link);
    }
    Ok(())
}
