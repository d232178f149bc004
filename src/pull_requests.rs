//! # Pull Request Orchestration
//!
//! Creates pull requests spanning the base repo and enabled modules.
//!
//! Only repositories with a non-empty diff against their target branch get a
//! pull request. Before each PR the current branch is pushed to a resolved
//! remote; pushes to protected branches and protected remotes are refused.
//! When the change spans more than one repository, each PR gets a comment
//! cross-linking the others so reviewers can find the whole change.

use crate::codehost::CodeHost;
use crate::error::{Error, Result};
use crate::model::{PullRequestRecord, Repository, BASE_REPO};
use crate::registry::ModuleRegistry;
use crate::vcs::{Remote, VcsClient};

/// Lead-in for the cross-linking comment posted on each pull request.
pub const PR_CROSSLINK_PREFIX: &str =
    "This code review is spread across multiple repositories. Here are the \
     other pull requests associated with this change:";

/// Creates and cross-links pull requests over the enabled repositories.
pub struct PullRequestOrchestrator<'a> {
    vcs: &'a dyn VcsClient,
    registry: &'a ModuleRegistry<'a>,
    host: &'a dyn CodeHost,
}

impl<'a> PullRequestOrchestrator<'a> {
    pub fn new(
        vcs: &'a dyn VcsClient,
        registry: &'a ModuleRegistry<'a>,
        host: &'a dyn CodeHost,
    ) -> Self {
        Self {
            vcs,
            registry,
            host,
        }
    }

    /// Whether the repository's HEAD differs from its target branch.
    pub fn repo_has_changes(&self, repository: &Repository) -> Result<bool> {
        self.vcs
            .check_diff_between(&repository.target_branch, repository.directory.as_deref())
    }

    /// Resolve the remote to push to for one repository.
    ///
    /// The alias (default `origin`) is matched against remote names first;
    /// failing that, against remote URLs as a substring, where zero matches
    /// is `UnknownRemote` and more than one is `AmbiguousRemote`. The
    /// resolved remote is refused as `ProtectedRemote` when it is named
    /// `upstream` or its URL is the module's configured repository URL:
    /// feature branches go to forks, not to the canonical repo.
    pub fn resolve_push_remote(
        &self,
        repository: &Repository,
        alias: Option<&str>,
    ) -> Result<String> {
        let directory = repository.directory.as_deref();
        let remotes = self.vcs.remotes(directory)?;
        let alias = alias.unwrap_or("origin");

        let resolved: Remote = match remotes.iter().find(|r| r.name == alias) {
            Some(remote) => remote.clone(),
            None => {
                let candidates: Vec<&Remote> =
                    remotes.iter().filter(|r| r.url.contains(alias)).collect();
                match candidates.as_slice() {
                    [] => {
                        return Err(Error::UnknownRemote {
                            remote: alias.to_string(),
                            directory: directory
                                .map(|d| d.display().to_string())
                                .unwrap_or_else(|| ".".to_string()),
                        })
                    }
                    [only] => (*only).clone(),
                    many => {
                        return Err(Error::AmbiguousRemote {
                            remote: alias.to_string(),
                            candidates: many
                                .iter()
                                .map(|r| r.name.as_str())
                                .collect::<Vec<_>>()
                                .join(", "),
                        })
                    }
                }
            }
        };

        if resolved.name == "upstream" {
            return Err(Error::ProtectedRemote {
                remote: resolved.name,
                url: resolved.url,
            });
        }
        if repository.name != BASE_REPO {
            let module = self.registry.module(&repository.name)?;
            if resolved.url == module.repo {
                return Err(Error::ProtectedRemote {
                    remote: resolved.name,
                    url: resolved.url,
                });
            }
        }
        Ok(resolved.name)
    }

    /// Create a pull request for every repository with changes.
    ///
    /// Per changed repository: push the current branch to the resolved
    /// remote, then open a PR with the given title (falling back to the
    /// repo's latest commit subject) and body. When more than one PR was
    /// created, each gets a comment listing the others.
    ///
    /// Returns the created records; an empty list means nothing differed
    /// from its target branch.
    pub fn create_pull_requests(
        &self,
        title: Option<&str>,
        body: Option<&str>,
        remote_alias: Option<&str>,
    ) -> Result<Vec<PullRequestRecord>> {
        let repositories = self.registry.collect_repositories()?;
        let mut changed = Vec::new();
        for repository in repositories {
            if self.repo_has_changes(&repository)? {
                changed.push(repository);
            } else {
                log::debug!("no changes in {}, skipping", repository.name);
            }
        }
        if changed.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::with_capacity(changed.len());
        for repository in &changed {
            let directory = repository.directory.as_deref();
            let remote = self.resolve_push_remote(repository, remote_alias)?;
            self.vcs.push_current_branch(&remote, directory)?;

            let pr_title = match title {
                Some(title) => title.to_string(),
                None => self.vcs.latest_commit_message(directory)?,
            };
            let args = vec![
                "--title".to_string(),
                pr_title,
                "--body".to_string(),
                body.unwrap_or_default().to_string(),
            ];
            let link = self.host.create_pull_request(&args, directory)?;
            log::info!("created pull request for {}: {}", repository.name, link);
            records.push(PullRequestRecord {
                name: repository.name.clone(),
                link,
            });
        }

        if records.len() > 1 {
            self.cross_link(&changed, &records)?;
        }
        Ok(records)
    }

    /// Comment on each PR with links to all the others.
    fn cross_link(
        &self,
        repositories: &[Repository],
        records: &[PullRequestRecord],
    ) -> Result<()> {
        for (repository, record) in repositories.iter().zip(records) {
            let others: Vec<String> = records
                .iter()
                .filter(|other| other.link != record.link)
                .map(PullRequestRecord::comment_line)
                .collect();
            let comment = format!("{}\n{}", PR_CROSSLINK_PREFIX, others.join("\n"));
            self.host.comment_on_pull_request(
                &record.link,
                &comment,
                repository.directory.as_deref(),
            )?;
        }
        Ok(())
    }
}
