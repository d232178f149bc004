//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use modlink::output::OutputConfig;

use crate::commands;
use crate::commands::Services;

/// Modlink - Coordinate a base repository and its sibling module repos
#[derive(Parser, Debug)]
#[command(name = "modlink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Build-system project the base repository belongs to
    #[arg(
        short,
        long,
        global = true,
        value_name = "PROJECT",
        env = "MODLINK_PROJECT"
    )]
    project: Option<String>,

    /// Directory shared module clones are placed in
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "MODLINK_MODULES_DIR"
    )]
    modules_dir: Option<PathBuf>,

    /// Binary name of the build-system CLI
    #[arg(long, global = true, value_name = "BIN", env = "MODLINK_BUILD_CLI")]
    build_cli: Option<String>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Enable a module in the base repository
    Enable(commands::enable::EnableArgs),
    /// Disable a module in the base repository
    Disable(commands::disable::DisableArgs),
    /// List the modules of the project
    List(commands::list::ListArgs),
    /// Manage branches across the base repo and enabled modules
    Branch(commands::branch::BranchArgs),
    /// Pull the base repository and sync modules to it
    Pull(commands::pull::PullArgs),
    /// Show git status for every repository
    Status(commands::status::StatusArgs),
    /// Stage files across repositories
    Add(commands::add::AddArgs),
    /// Restore files across repositories
    Restore(commands::restore::RestoreArgs),
    /// Commit in every repository with changes
    Commit(commands::commit::CommitArgs),
    /// Submit a patch build including enabled modules
    Patch(commands::patch::PatchArgs),
    /// Submit to the commit queue including enabled modules
    CommitQueue(commands::commit_queue::CommitQueueArgs),
    /// Create pull requests for every repository with changes
    Pr(commands::pr::PrArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(&self.log_level),
        )
        .init();

        let output = OutputConfig::from_env_and_flag(&self.color);
        let services = Services::resolve(self.project, self.modules_dir, self.build_cli, output)?;

        match self.command {
            Commands::Enable(args) => commands::enable::execute(args, &services),
            Commands::Disable(args) => commands::disable::execute(args, &services),
            Commands::List(args) => commands::list::execute(args, &services),
            Commands::Branch(args) => commands::branch::execute(args, &services),
            Commands::Pull(args) => commands::pull::execute(args, &services),
            Commands::Status(args) => commands::status::execute(args, &services),
            Commands::Add(args) => commands::add::execute(args, &services),
            Commands::Restore(args) => commands::restore::execute(args, &services),
            Commands::Commit(args) => commands::commit::execute(args, &services),
            Commands::Patch(args) => commands::patch::execute(args, &services),
            Commands::CommitQueue(args) => commands::commit_queue::execute(args, &services),
            Commands::Pr(args) => commands::pr::execute(args, &services),
        }
    }
}
