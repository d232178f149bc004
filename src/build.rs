//! # Build System Client
//!
//! This module wraps the hosted build system's CLI behind the `BuildService`
//! trait: project metadata lookups, manifest fetches, and patch /
//! commit-queue submission. The binary name is configurable since different
//! deployments install the client under different names.
//!
//! Patch submission output is a human-oriented report; the patch id and
//! build URL are extracted from it with regular expressions, and
//! unrecognizable output is a hard error rather than a guess.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::process;

fn patch_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)ID\s:\s(?P<patch_id>\S+)$").unwrap())
}

fn build_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)Build\s:\s(?P<build_url>\S+)$").unwrap())
}

/// Information about a created patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchInfo {
    /// Id of the created patch.
    pub patch_id: String,
    /// URL to the patch in the build system's UI.
    pub patch_url: String,
}

/// Metadata about a project, as reported by the build system.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProjectInfo {
    /// Path of the project's config file within the base repository.
    pub remote_path: String,
    /// Branch the project builds from.
    pub branch_name: String,
}

/// Trait over the build-system operations the orchestrators need - allows
/// mocking in tests.
pub trait BuildService {
    /// Path to the project's build configuration file within the base repo.
    fn project_config_location(&self, project_id: &str) -> Result<PathBuf>;

    /// The git branch the project builds from.
    fn project_branch(&self, project_id: &str) -> Result<String>;

    /// The manifest pinned at the given base-repo revision.
    fn manifest(&self, project_id: &str, revision: &str) -> Result<Manifest>;

    /// Create a patch build, forwarding any extra CLI arguments.
    fn create_patch(&self, project_id: &str, extra_args: &[String]) -> Result<PatchInfo>;

    /// Attach a module's changes to an existing patch.
    fn add_module_to_patch(
        &self,
        patch_id: &str,
        module: &str,
        directory: &Path,
        extra_args: &[String],
    ) -> Result<()>;

    /// Create a commit-queue entry, paused so modules can be attached.
    fn create_cq_patch(&self, project_id: &str, extra_args: &[String]) -> Result<PatchInfo>;

    /// Attach a module's changes to a commit-queue entry.
    fn add_module_to_cq_patch(
        &self,
        patch_id: &str,
        module: &str,
        directory: &Path,
        extra_args: &[String],
    ) -> Result<()>;

    /// Resume a paused commit-queue entry.
    fn finalize_cq_patch(&self, patch_id: &str) -> Result<()>;
}

/// `BuildService` implementation that shells out to the build system's CLI.
#[derive(Debug)]
pub struct BuildCli {
    binary: String,
}

impl BuildCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Name of the wrapped binary, for tool-existence validation.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn run(&self, args: &[String], directory: Option<&Path>) -> Result<String> {
        process::run(&self.binary, args, directory).map_err(|e| Error::BuildCommand {
            command: e.command,
            stderr: e.stderr,
        })
    }

    fn project_info(&self, project_id: &str) -> Result<ProjectInfo> {
        let args = vec![
            "project".to_string(),
            "--id".to_string(),
            project_id.to_string(),
            "--json".to_string(),
        ];
        let output = self.run(&args, None)?;
        Ok(serde_json::from_str(&output)?)
    }
}

/// Extract the patch id and build URL from patch-submission output.
fn parse_patch_output(command: &str, output: &str) -> Result<PatchInfo> {
    let patch_match = patch_id_re().captures(output);
    let build_match = build_url_re().captures(output);
    match (patch_match, build_match) {
        (Some(patch), Some(build)) => Ok(PatchInfo {
            patch_id: patch["patch_id"].to_string(),
            patch_url: build["build_url"].to_string(),
        }),
        _ => Err(Error::UnrecognizedOutput {
            command: command.to_string(),
            output: output.to_string(),
        }),
    }
}

impl BuildService for BuildCli {
    fn project_config_location(&self, project_id: &str) -> Result<PathBuf> {
        Ok(PathBuf::from(self.project_info(project_id)?.remote_path))
    }

    fn project_branch(&self, project_id: &str) -> Result<String> {
        Ok(self.project_info(project_id)?.branch_name)
    }

    fn manifest(&self, project_id: &str, revision: &str) -> Result<Manifest> {
        let args = vec![
            "manifest".to_string(),
            "--project".to_string(),
            project_id.to_string(),
            "--revision".to_string(),
            revision.to_string(),
            "--json".to_string(),
        ];
        let output = self.run(&args, None)?;
        Ok(serde_json::from_str(&output)?)
    }

    fn create_patch(&self, project_id: &str, extra_args: &[String]) -> Result<PatchInfo> {
        let mut args = vec![
            "patch".to_string(),
            "--project".to_string(),
            project_id.to_string(),
            "--skip_confirm".to_string(),
        ];
        args.extend(extra_args.iter().cloned());
        let output = self.run(&args, None)?;
        parse_patch_output("patch", &output)
    }

    fn add_module_to_patch(
        &self,
        patch_id: &str,
        module: &str,
        directory: &Path,
        extra_args: &[String],
    ) -> Result<()> {
        let mut args = vec![
            "patch-set-module".to_string(),
            "--module".to_string(),
            module.to_string(),
            "--patch".to_string(),
            patch_id.to_string(),
            "--skip_confirm".to_string(),
        ];
        // Only a subset of patch flags make sense for module attachment.
        for flag in ["-u", "--uncommitted", "--large", "--preserve-commits"] {
            if extra_args.iter().any(|a| a == flag) {
                let forwarded = if flag == "-u" { "--uncommitted" } else { flag };
                if !args.iter().any(|a| a == forwarded) {
                    args.push(forwarded.to_string());
                }
            }
        }
        self.run(&args, Some(directory))?;
        Ok(())
    }

    fn create_cq_patch(&self, project_id: &str, extra_args: &[String]) -> Result<PatchInfo> {
        let mut args = vec![
            "commit-queue".to_string(),
            "merge".to_string(),
            "--project".to_string(),
            project_id.to_string(),
            "--pause".to_string(),
        ];
        args.extend(extra_args.iter().cloned());
        let output = self.run(&args, None)?;
        parse_patch_output("commit-queue merge", &output)
    }

    fn add_module_to_cq_patch(
        &self,
        patch_id: &str,
        module: &str,
        directory: &Path,
        extra_args: &[String],
    ) -> Result<()> {
        let mut args = vec![
            "commit-queue".to_string(),
            "set-module".to_string(),
            "--module".to_string(),
            module.to_string(),
            "--id".to_string(),
            patch_id.to_string(),
            "--skip_confirm".to_string(),
        ];
        args.extend(extra_args.iter().cloned());
        self.run(&args, Some(directory))?;
        Ok(())
    }

    fn finalize_cq_patch(&self, patch_id: &str) -> Result<()> {
        let args = vec![
            "commit-queue".to_string(),
            "merge".to_string(),
            "--resume".to_string(),
            patch_id.to_string(),
        ];
        self.run(&args, None)?;
        Ok(())
    }
}
