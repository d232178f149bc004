//! List command implementation

use anyhow::Result;
use clap::Args;

use crate::commands::Services;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show enabled modules
    #[arg(long)]
    pub enabled: bool,

    /// Show repository URL, branch, and link location per module
    #[arg(long)]
    pub details: bool,
}

/// Execute the list command
pub fn execute(args: ListArgs, services: &Services) -> Result<()> {
    services.validate_core_tools()?;
    let registry = services.registry();
    let modules = registry.all_modules(args.enabled)?;
    for module in modules.values() {
        let marker = if registry.is_enabled(module) {
            " (enabled)"
        } else {
            ""
        };
        if args.details {
            println!("{}{}", module.name, marker);
            println!("  repo: {}", module.repo);
            println!("  branch: {}", module.branch);
            println!("  location: {}", module.location().display());
        } else {
            println!("{}{}", module.name, marker);
        }
    }
    Ok(())
}
