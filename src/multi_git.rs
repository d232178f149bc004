//! # Multi-Repository Git Orchestration
//!
//! Fans git operations out over the base repository and every enabled
//! module.
//!
//! Two failure disciplines are used, chosen per operation:
//!
//! * *Error-tolerant* operations (move-to-revision, status, switch, delete,
//!   add, restore) run in every repository regardless of individual
//!   failures and return the per-repository errors in a map keyed by
//!   repository name, so one broken module never hides the state of the
//!   others.
//! * *Abort-on-first-failure* operations (branch creation) stop at the
//!   first error: a branch that exists in some repositories but not others
//!   is worse than no branch at all.
//!
//! Whenever an operation moves the base repository (`operate_on_base`,
//! `pull`, `update_current_branch`), the base moves first and the module
//! revisions are resolved from the manifest of the history the base just
//! landed on. Reordering would sync modules against a stale base state.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fs_util::FileService;
use crate::lifecycle::ModuleLifecycle;
use crate::model::{GitCommandOutput, Repository, BASE_REPO};
use crate::registry::ModuleRegistry;
use crate::vcs::{GitAction, VcsClient};

const GIT_IGNORE_FILE: &str = ".gitignore";

/// Key the base repository's failure is recorded under in the error map
/// returned by [`MultiRepoGit::operate_on_base`].
pub const BASE_ERROR_KEY: &str = "BASE";

/// Per-repository errors from an error-tolerant fan-out, keyed by
/// repository name.
pub type RepoErrors = BTreeMap<String, Error>;

/// Whether a repository's short status contains anything a commit would
/// pick up. Untracked files (`??`) never count. Without `add`, only
/// entries already staged (non-blank index column) count; with `add`, any
/// tracked change does.
fn has_committable_change(short_status: &str, add: bool) -> bool {
    short_status
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with("??"))
        .any(|line| add || !line.starts_with(' '))
}

/// File paths from short status output, in the order git reports them.
fn touched_files(short_status: &str) -> Vec<String> {
    short_status
        .lines()
        .filter_map(|line| {
            if line.len() < 4 {
                return None;
            }
            let (_code, path) = line.split_at(3);
            let path = path.trim();
            if path.is_empty() {
                return None;
            }
            Some(path.to_string())
        })
        .collect()
}

/// Fans git operations out over the base repo and enabled modules.
pub struct MultiRepoGit<'a> {
    vcs: &'a dyn VcsClient,
    registry: &'a ModuleRegistry<'a>,
    lifecycle: &'a ModuleLifecycle<'a>,
    fs: &'a dyn FileService,
}

impl<'a> MultiRepoGit<'a> {
    pub fn new(
        vcs: &'a dyn VcsClient,
        registry: &'a ModuleRegistry<'a>,
        lifecycle: &'a ModuleLifecycle<'a>,
        fs: &'a dyn FileService,
    ) -> Self {
        Self {
            vcs,
            registry,
            lifecycle,
            fs,
        }
    }

    /// Run `operation` in every repository, tolerating per-repository
    /// failures. Successes land in the output list, failures in the error
    /// map; both preserve the registry's repository order.
    fn fan_out<F>(&self, operation: F) -> Result<(Vec<GitCommandOutput>, RepoErrors)>
    where
        F: Fn(&Repository) -> Result<String>,
    {
        let repositories = self.registry.collect_repositories()?;
        let mut outputs = Vec::new();
        let mut errors = RepoErrors::new();
        for repository in &repositories {
            match operation(repository) {
                Ok(output) => outputs.push(GitCommandOutput::new(&repository.name, output)),
                Err(e) => {
                    log::warn!("operation failed in {}: {}", repository.name, e);
                    errors.insert(repository.name.clone(), e);
                }
            }
        }
        Ok((outputs, errors))
    }

    /// Perform `action` against the base repo at the literal `revision`,
    /// then move every enabled module to its own manifest-pinned revision
    /// with the same action. The base and the modules land on corresponding
    /// build-verified points, not on the same revision string.
    ///
    /// Each repository's attempt is wrapped: a failure is logged and
    /// recorded in the returned map (keyed [`BASE_ERROR_KEY`] for the base)
    /// and the remaining repositories are still processed. `branch_name` is
    /// only meaningful for the checkout action.
    pub fn operate_on_base(
        &self,
        action: GitAction,
        revision: &str,
        branch_name: Option<&str>,
    ) -> Result<RepoErrors> {
        let mut errors = RepoErrors::new();
        if let Err(e) = self
            .vcs
            .perform_action(action, revision, branch_name, None)
        {
            log::warn!("{} failed in the base repo: {}", action, e);
            errors.insert(BASE_ERROR_KEY.to_string(), e);
        }

        let enabled = self.registry.all_modules(true)?;
        if enabled.is_empty() {
            return Ok(errors);
        }
        // Resolved after the base move so the pins match the new history.
        let manifest = self.lifecycle.current_manifest()?;
        for (name, module) in enabled {
            if let Err(e) = self
                .lifecycle
                .sync_module(&module, &manifest, action, branch_name)
            {
                log::warn!("{} failed in {}: {}", action, name, e);
                errors.insert(name, e);
            }
        }
        Ok(errors)
    }

    /// Create `branch_name` in every repository: check out `revision` in
    /// the base repo, sync all enabled modules to the manifest pinned at
    /// that point, then create the branch everywhere. Returns the names of
    /// the repositories the branch was created in.
    ///
    /// Aborts at the first failure so a branch that exists in some
    /// repositories but not others never happens silently.
    pub fn create_branch(&self, branch_name: &str, revision: &str) -> Result<Vec<String>> {
        self.vcs.checkout(Some(revision), None, None)?;
        let synced = self.lifecycle.sync_all_enabled(GitAction::Checkout, None)?;

        let names: Vec<String> = synced.into_iter().map(|(name, _)| name).collect();
        let repositories = self.registry.collect_repositories_for(&names)?;
        for repository in &repositories {
            if let Err(e) =
                self.vcs
                    .checkout(None, repository.directory.as_deref(), Some(branch_name))
            {
                log::error!(
                    "branch creation stopped at {}; remaining repositories were not attempted",
                    repository.name
                );
                return Err(e);
            }
        }
        Ok(repositories.into_iter().map(|r| r.name).collect())
    }

    /// Check out an existing branch in every repository.
    pub fn switch_branch(&self, branch_name: &str) -> Result<(Vec<GitCommandOutput>, RepoErrors)> {
        self.fan_out(|repo| {
            self.vcs
                .checkout(Some(branch_name), repo.directory.as_deref(), None)?;
            Ok(branch_name.to_string())
        })
    }

    /// Delete a branch in every repository.
    pub fn delete_branch(&self, branch_name: &str) -> Result<(Vec<GitCommandOutput>, RepoErrors)> {
        self.fan_out(|repo| {
            self.vcs
                .branch(Some(branch_name), repo.directory.as_deref())
        })
    }

    /// `git branch` output for every repository.
    pub fn list_branches(&self) -> Result<(Vec<GitCommandOutput>, RepoErrors)> {
        self.fan_out(|repo| self.vcs.branch(None, repo.directory.as_deref()))
    }

    /// Long-form `git status` output for every repository.
    pub fn status(&self) -> Result<(Vec<GitCommandOutput>, RepoErrors)> {
        self.fan_out(|repo| self.vcs.status(false, repo.directory.as_deref()))
    }

    /// Pull the current branch in the base repo, then re-sync every enabled
    /// module to the manifest at the new base revision, rebasing or merging
    /// local module commits to match. Returns `(module, revision)` pairs.
    pub fn pull(&self, rebase: bool) -> Result<Vec<(String, String)>> {
        self.vcs.pull(rebase, None)?;
        let action = if rebase {
            GitAction::Rebase
        } else {
            GitAction::Merge
        };
        self.lifecycle.sync_all_enabled(action, None)
    }

    /// Bring the current branch up to date with `upstream`: fetch every
    /// repository, move the base repo onto `upstream` (rebase or merge),
    /// then sync every module to the manifest pinned for the updated base.
    pub fn update_current_branch(
        &self,
        upstream: &str,
        rebase: bool,
    ) -> Result<Vec<(String, String)>> {
        for repository in self.registry.collect_repositories()? {
            self.vcs.fetch(repository.directory.as_deref())?;
        }
        let action = if rebase {
            GitAction::Rebase
        } else {
            GitAction::Merge
        };
        self.vcs.perform_action(action, upstream, None, None)?;
        self.lifecycle.sync_all_enabled(action, None)
    }

    /// Commit the base repo (always, with `--all`), then every enabled
    /// module that has a committable change; clean modules are silently
    /// skipped. With `add`, any tracked change counts as committable and is
    /// included in the module commits; otherwise only staged changes do.
    /// Returns the names of the repositories that were committed.
    pub fn commit_all(
        &self,
        message: Option<&str>,
        amend: bool,
        add: bool,
    ) -> Result<Vec<String>> {
        self.vcs.commit(message, amend, true, None)?;
        let mut committed = vec![BASE_REPO.to_string()];
        for (name, module) in self.registry.all_modules(true)? {
            let location = module.location();
            let short_status = self.vcs.status(true, Some(&location))?;
            if !has_committable_change(&short_status, add) {
                continue;
            }
            self.vcs.commit(message, amend, add, Some(&location))?;
            committed.push(name);
        }
        Ok(committed)
    }

    /// Stage the files matching `pathspecs` in every repository.
    ///
    /// Per repository, the pathspecs are resolved in two stages: `ls-files`
    /// (tracked plus untracked, `.gitignore` respected) yields the matching
    /// files, and the short status yields the touched files; only their
    /// intersection is staged, in the order the status reported them. A
    /// repository with an empty intersection is skipped entirely - git
    /// rejects an `add` with no paths.
    pub fn add(&self, pathspecs: &[String]) -> Result<(Vec<GitCommandOutput>, RepoErrors)> {
        self.fan_out(|repo| {
            let selected = self.select_files(pathspecs, repo)?;
            if selected.is_empty() {
                return Ok(String::new());
            }
            self.vcs.add(&selected, repo.directory.as_deref())?;
            Ok(selected.join("\n"))
        })
    }

    /// Restore the files matching `pathspecs` in every repository,
    /// optionally unstaging instead of discarding. Same two-stage pathspec
    /// resolution and empty-intersection skip as [`add`](Self::add).
    pub fn restore(
        &self,
        pathspecs: &[String],
        staged: bool,
    ) -> Result<(Vec<GitCommandOutput>, RepoErrors)> {
        self.fan_out(|repo| {
            let selected = self.select_files(pathspecs, repo)?;
            if selected.is_empty() {
                return Ok(String::new());
            }
            self.vcs
                .restore(&selected, staged, repo.directory.as_deref())?;
            Ok(selected.join("\n"))
        })
    }

    /// Intersect the pathspec-matching files with the touched files of one
    /// repository, preserving the touched order.
    ///
    /// The `.gitignore` exclude file is only passed to `ls-files` when the
    /// repository actually has one; git refuses a missing exclude file.
    fn select_files(&self, pathspecs: &[String], repo: &Repository) -> Result<Vec<String>> {
        let ignore_path = repo
            .directory
            .as_deref()
            .unwrap_or(Path::new("."))
            .join(GIT_IGNORE_FILE);
        let ignore_file = if self.fs.path_exists(&ignore_path) {
            Some(GIT_IGNORE_FILE)
        } else {
            None
        };
        let matching = self.vcs.ls_files(
            pathspecs,
            true,
            true,
            ignore_file,
            repo.directory.as_deref(),
        )?;
        let short_status = self.vcs.status(true, repo.directory.as_deref())?;
        let touched = touched_files(&short_status);
        Ok(touched
            .into_iter()
            .filter(|file| matching.iter().any(|m| m == file))
            .collect())
    }
}
