//! # Version Control Client
//!
//! This module wraps the system `git` command behind the `VcsClient` trait.
//! Every method takes an explicit optional working directory which is passed
//! to the child process; the tool never changes its own current directory.
//! `None` means the base repository (the directory the tool was invoked
//! from).
//!
//! Using the system git command means SSH keys, credential helpers, and
//! anything else configured in `~/.gitconfig` work without any handling on
//! our side.
//!
//! The trait exists so orchestration logic can be tested against a recording
//! fake instead of a real working tree.

use std::path::Path;

use crate::error::{Error, Result};
use crate::process;

/// Branches that must never be pushed to directly.
pub const PROTECTED_BRANCHES: &[&str] = &["main", "master"];

/// The git actions that can be fanned out across repositories.
///
/// Kept as a sum type so dispatch is exhaustive: adding an action is a
/// compile-time-checked change everywhere it is handled. The same type
/// doubles as the module sync strategy (how a module's working tree is moved
/// to its manifest-pinned revision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GitAction {
    /// Move to the revision directly (force/detached move). The default
    /// strategy for syncing modules.
    #[default]
    Checkout,
    /// Replay local commits on top of the revision.
    Rebase,
    /// Three-way merge the revision into the current branch.
    Merge,
}

impl std::fmt::Display for GitAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GitAction::Checkout => "checkout",
            GitAction::Rebase => "rebase",
            GitAction::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// A named remote of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Trait over the git primitives the orchestrators need - allows mocking in
/// tests.
///
/// `directory: None` runs the command in the process's current working
/// directory (the base repository).
pub trait VcsClient {
    /// Clone `remote_url` into `parent_dir/name`, optionally checking out
    /// `branch`.
    fn clone_repo(
        &self,
        name: &str,
        remote_url: &str,
        parent_dir: &Path,
        branch: Option<&str>,
    ) -> Result<()>;

    /// Fetch from origin.
    fn fetch(&self, directory: Option<&Path>) -> Result<()>;

    /// Pull the current branch, merging or rebasing local commits.
    fn pull(&self, rebase: bool, directory: Option<&Path>) -> Result<()>;

    /// Checkout a revision and/or create a branch (`checkout -b`).
    fn checkout(
        &self,
        revision: Option<&str>,
        directory: Option<&Path>,
        branch_name: Option<&str>,
    ) -> Result<()>;

    /// Rebase the current branch onto the given revision.
    fn rebase(&self, onto: &str, directory: Option<&Path>) -> Result<()>;

    /// Merge the given revision into the current branch.
    fn merge(&self, revision: &str, directory: Option<&Path>) -> Result<()>;

    /// Run `git status`, optionally in `--short` form, returning raw output.
    fn status(&self, short: bool, directory: Option<&Path>) -> Result<String>;

    /// Run `git ls-files` with the given pathspecs.
    fn ls_files(
        &self,
        pathspecs: &[String],
        cached: bool,
        others: bool,
        ignore_file: Option<&str>,
        directory: Option<&Path>,
    ) -> Result<Vec<String>>;

    /// Stage the given files.
    fn add(&self, files: &[String], directory: Option<&Path>) -> Result<()>;

    /// Restore the given files, optionally unstaging them.
    fn restore(&self, files: &[String], staged: bool, directory: Option<&Path>) -> Result<()>;

    /// Run `git branch`, optionally deleting the named branch, returning raw
    /// output.
    fn branch(&self, delete: Option<&str>, directory: Option<&Path>) -> Result<String>;

    /// Create a commit from the staged (or, with `add`, all tracked)
    /// changes.
    fn commit(
        &self,
        message: Option<&str>,
        amend: bool,
        add: bool,
        directory: Option<&Path>,
    ) -> Result<()>;

    /// Name of the currently checked-out branch.
    fn current_branch(&self, directory: Option<&Path>) -> Result<String>;

    /// Commit hash of the current HEAD.
    fn current_commit(&self, directory: Option<&Path>) -> Result<String>;

    /// Common ancestor of the two given commits.
    fn merge_base(&self, commit_a: &str, commit_b: &str, directory: Option<&Path>)
        -> Result<String>;

    /// Whether there is a non-empty diff between `branch` and HEAD.
    fn check_diff_between(&self, branch: &str, directory: Option<&Path>) -> Result<bool>;

    /// Subject line of the most recent commit.
    fn latest_commit_message(&self, directory: Option<&Path>) -> Result<String>;

    /// The configured remotes of the repository.
    fn remotes(&self, directory: Option<&Path>) -> Result<Vec<Remote>>;

    /// Push the current branch to the given remote.
    ///
    /// Fails with `ProtectedBranchPush` when the current branch is in
    /// [`PROTECTED_BRANCHES`]; never pushes directly to a protected branch.
    fn push_current_branch(&self, remote: &str, directory: Option<&Path>) -> Result<String>;

    /// Perform the given action against a repository at a revision.
    ///
    /// `branch_name` is only meaningful for [`GitAction::Checkout`], where it
    /// creates the branch at the revision.
    fn perform_action(
        &self,
        action: GitAction,
        revision: &str,
        branch_name: Option<&str>,
        directory: Option<&Path>,
    ) -> Result<()> {
        match action {
            GitAction::Checkout => self.checkout(Some(revision), directory, branch_name),
            GitAction::Rebase => self.rebase(revision, directory),
            GitAction::Merge => self.merge(revision, directory),
        }
    }
}

/// `VcsClient` implementation that shells out to the system `git` binary.
#[derive(Debug, Default)]
pub struct GitCli;

impl GitCli {
    fn run(&self, args: &[String], directory: Option<&Path>) -> Result<String> {
        process::run("git", args, directory).map_err(|e| Error::GitCommand {
            command: e.command,
            stderr: e.stderr,
        })
    }
}

fn to_args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

impl VcsClient for GitCli {
    fn clone_repo(
        &self,
        name: &str,
        remote_url: &str,
        parent_dir: &Path,
        branch: Option<&str>,
    ) -> Result<()> {
        let mut args = to_args(&["clone"]);
        if let Some(branch) = branch {
            args.push("--branch".to_string());
            args.push(branch.to_string());
        }
        args.push(remote_url.to_string());
        args.push(name.to_string());
        self.run(&args, Some(parent_dir))?;
        Ok(())
    }

    fn fetch(&self, directory: Option<&Path>) -> Result<()> {
        self.run(&to_args(&["fetch", "origin"]), directory)?;
        Ok(())
    }

    fn pull(&self, rebase: bool, directory: Option<&Path>) -> Result<()> {
        let mut args = to_args(&["pull"]);
        if rebase {
            args.push("--rebase".to_string());
        }
        self.run(&args, directory)?;
        Ok(())
    }

    fn checkout(
        &self,
        revision: Option<&str>,
        directory: Option<&Path>,
        branch_name: Option<&str>,
    ) -> Result<()> {
        let mut args = to_args(&["checkout"]);
        if let Some(branch_name) = branch_name {
            args.push("-b".to_string());
            args.push(branch_name.to_string());
        }
        if let Some(revision) = revision {
            args.push(revision.to_string());
        }
        self.run(&args, directory)?;
        Ok(())
    }

    fn rebase(&self, onto: &str, directory: Option<&Path>) -> Result<()> {
        self.run(&to_args(&["rebase", onto]), directory)?;
        Ok(())
    }

    fn merge(&self, revision: &str, directory: Option<&Path>) -> Result<()> {
        self.run(&to_args(&["merge", revision]), directory)?;
        Ok(())
    }

    fn status(&self, short: bool, directory: Option<&Path>) -> Result<String> {
        let mut args = to_args(&["status"]);
        if short {
            args.push("--short".to_string());
        }
        self.run(&args, directory)
    }

    fn ls_files(
        &self,
        pathspecs: &[String],
        cached: bool,
        others: bool,
        ignore_file: Option<&str>,
        directory: Option<&Path>,
    ) -> Result<Vec<String>> {
        let mut args = to_args(&["ls-files"]);
        if cached {
            args.push("--cached".to_string());
        }
        if others {
            args.push("--others".to_string());
        }
        if let Some(ignore_file) = ignore_file {
            args.push(format!("--exclude-from={}", ignore_file));
        }
        args.extend(pathspecs.iter().cloned());
        let output = self.run(&args, directory)?;
        Ok(output.lines().map(|line| line.to_string()).collect())
    }

    fn add(&self, files: &[String], directory: Option<&Path>) -> Result<()> {
        let mut args = to_args(&["add"]);
        args.extend(files.iter().cloned());
        self.run(&args, directory)?;
        Ok(())
    }

    fn restore(&self, files: &[String], staged: bool, directory: Option<&Path>) -> Result<()> {
        let mut args = to_args(&["restore"]);
        if staged {
            args.push("--staged".to_string());
        }
        args.extend(files.iter().cloned());
        self.run(&args, directory)?;
        Ok(())
    }

    fn branch(&self, delete: Option<&str>, directory: Option<&Path>) -> Result<String> {
        let mut args = to_args(&["branch"]);
        if let Some(branch) = delete {
            args.push("-D".to_string());
            args.push(branch.to_string());
        }
        self.run(&args, directory)
    }

    fn commit(
        &self,
        message: Option<&str>,
        amend: bool,
        add: bool,
        directory: Option<&Path>,
    ) -> Result<()> {
        let mut args = to_args(&["commit"]);
        if let Some(message) = message {
            args.push("--message".to_string());
            args.push(message.to_string());
        }
        if amend {
            args.push("--amend".to_string());
            args.push("--reuse-message=HEAD".to_string());
        }
        if add {
            args.push("--all".to_string());
        }
        self.run(&args, directory)?;
        Ok(())
    }

    fn current_branch(&self, directory: Option<&Path>) -> Result<String> {
        let output = self.run(&to_args(&["rev-parse", "--abbrev-ref", "HEAD"]), directory)?;
        Ok(output.trim().to_string())
    }

    fn current_commit(&self, directory: Option<&Path>) -> Result<String> {
        let output = self.run(&to_args(&["rev-parse", "HEAD"]), directory)?;
        Ok(output.trim().to_string())
    }

    fn merge_base(
        &self,
        commit_a: &str,
        commit_b: &str,
        directory: Option<&Path>,
    ) -> Result<String> {
        let output = self.run(&to_args(&["merge-base", commit_a, commit_b]), directory)?;
        Ok(output.trim().to_string())
    }

    fn check_diff_between(&self, branch: &str, directory: Option<&Path>) -> Result<bool> {
        let range = format!("{}..HEAD", branch);
        let output = self.run(&to_args(&["diff", &range]), directory)?;
        Ok(!output.trim().is_empty())
    }

    fn latest_commit_message(&self, directory: Option<&Path>) -> Result<String> {
        let output = self.run(&to_args(&["log", "-1", "--pretty=%s"]), directory)?;
        Ok(output.trim().to_string())
    }

    fn remotes(&self, directory: Option<&Path>) -> Result<Vec<Remote>> {
        let output = self.run(&to_args(&["remote", "-v"]), directory)?;
        Ok(parse_remotes(&output))
    }

    fn push_current_branch(&self, remote: &str, directory: Option<&Path>) -> Result<String> {
        let current_branch = self.current_branch(directory)?;
        if PROTECTED_BRANCHES.contains(&current_branch.as_str()) {
            log::warn!(
                "attempting to push protected branch '{}' in {:?}",
                current_branch,
                directory
            );
            return Err(Error::ProtectedBranchPush {
                branch: current_branch,
                directory: directory
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| ".".to_string()),
            });
        }

        let output = self.run(&to_args(&["push", "-u", remote, "HEAD"]), directory)?;
        Ok(output.trim().to_string())
    }
}

/// Parse `git remote -v` output into unique named remotes.
///
/// Each remote appears twice (fetch and push); the fetch line wins.
fn parse_remotes(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        if remotes.iter().any(|r| r.name == name) {
            continue;
        }
        remotes.push(Remote {
            name: name.to_string(),
            url: url.to_string(),
        });
    }
    remotes
}
