//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `modlink` command-line tool. Each subcommand is defined in its own file
//! to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the shared
//!   [`Services`] and performs the command's logic.
//!
//! [`Services`] is the composition root: it resolves the invocation options
//! and owns the production implementations of the external-collaborator
//! traits, from which each command wires up the orchestrators it needs.

pub mod add;
pub mod branch;
pub mod commit;
pub mod commit_queue;
pub mod disable;
pub mod enable;
pub mod list;
pub mod patch;
pub mod pr;
pub mod pull;
pub mod restore;
pub mod status;

use std::path::PathBuf;

use anyhow::Result;

use modlink::build::BuildCli;
use modlink::codehost::GhCli;
use modlink::fs_util::LocalFs;
use modlink::lifecycle::ModuleLifecycle;
use modlink::manifest::ManifestResolver;
use modlink::model::GitCommandOutput;
use modlink::multi_git::{MultiRepoGit, RepoErrors};
use modlink::options::{Options, SavedDefaults};
use modlink::output::OutputConfig;
use modlink::registry::ModuleRegistry;
use modlink::validation::ValidationService;
use modlink::vcs::GitCli;

/// Resolved options plus the production trait implementations every command
/// wires its orchestrators from.
pub struct Services {
    pub options: Options,
    pub output: OutputConfig,
    pub vcs: GitCli,
    pub build: BuildCli,
    pub host: GhCli,
    pub fs: LocalFs,
}

impl Services {
    /// Resolve invocation options (CLI values over saved defaults over
    /// built-ins) and construct the production collaborators.
    pub fn resolve(
        project: Option<String>,
        modules_dir: Option<PathBuf>,
        build_cli: Option<String>,
        output: OutputConfig,
    ) -> Result<Self> {
        let saved = SavedDefaults::load()?;
        let options = Options::resolve(project, modules_dir, build_cli, &saved)?;
        let build = BuildCli::new(options.build_cli.clone());
        Ok(Self {
            options,
            output,
            vcs: GitCli,
            build,
            host: GhCli,
            fs: LocalFs,
        })
    }

    pub fn registry(&self) -> ModuleRegistry<'_> {
        ModuleRegistry::new(&self.build, &self.fs, &self.options.project)
    }

    pub fn resolver(&self) -> ManifestResolver<'_> {
        ManifestResolver::new(&self.vcs, &self.build, &self.options.project)
    }

    pub fn validation(&self) -> ValidationService<'_> {
        ValidationService::new(&self.fs, &self.host)
    }

    /// Check the tools every git-touching command needs.
    pub fn validate_core_tools(&self) -> Result<()> {
        let validation = self.validation();
        validation.validate_git()?;
        validation.validate_build_cli(self.build.binary())?;
        Ok(())
    }
}

/// Wire up a [`ModuleLifecycle`] over the shared services and hand it to
/// `f`. The registry and resolver it borrows only live for the call.
pub fn with_lifecycle<T>(
    services: &Services,
    f: impl FnOnce(&ModuleLifecycle<'_>) -> Result<T>,
) -> Result<T> {
    let registry = services.registry();
    let resolver = services.resolver();
    let lifecycle = ModuleLifecycle::new(
        &registry,
        &resolver,
        &services.vcs,
        &services.fs,
        services.options.modules_directory.clone(),
    );
    f(&lifecycle)
}

/// Wire up a [`MultiRepoGit`] over the shared services and hand it to `f`.
pub fn with_multi_git<T>(
    services: &Services,
    f: impl FnOnce(&MultiRepoGit<'_>) -> Result<T>,
) -> Result<T> {
    let registry = services.registry();
    let resolver = services.resolver();
    let lifecycle = ModuleLifecycle::new(
        &registry,
        &resolver,
        &services.vcs,
        &services.fs,
        services.options.modules_directory.clone(),
    );
    let git = MultiRepoGit::new(&services.vcs, &registry, &lifecycle, &services.fs);
    f(&git)
}

/// Print the per-repository outcomes of a fanned-out git operation and turn
/// a non-empty error map into a non-zero exit.
pub fn report_fan_out(
    output: &OutputConfig,
    outputs: &[GitCommandOutput],
    errors: &RepoErrors,
) -> Result<()> {
    for result in outputs {
        if result.output.is_empty() {
            continue;
        }
        println!("{}", output.repo_header(&result.repo_name));
        println!("{}", result.output);
    }
    if !errors.is_empty() {
        for (repo_name, error) in errors {
            eprintln!("{}", output.failure_line(repo_name, &error.to_string()));
        }
        anyhow::bail!(
            "command failed in {} of {} repositories",
            errors.len(),
            errors.len() + outputs.len()
        );
    }
    Ok(())
}
