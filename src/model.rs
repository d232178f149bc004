//! # Orchestration Data Model
//!
//! Core entities shared by the registry and the orchestrators. All of these
//! are constructed fresh per command invocation from live queries (filesystem
//! checks, git status, manifest fetch) and discarded at process exit; the git
//! repositories on disk are the actual source of truth.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name used for the base repository in every orchestration pass.
pub const BASE_REPO: &str = "base";

/// A sibling repository known to the project.
///
/// Sourced from the project's build configuration; immutable for the
/// duration of a command invocation. Whether a module is *enabled* is never
/// stored here: it is recomputed from the filesystem on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Unique name of the module.
    pub name: String,
    /// Remote location of the module repository.
    pub repo: String,
    /// Default branch of the module repository.
    pub branch: String,
    /// Parent directory inside the base tree where the module is symlinked.
    pub prefix: String,
}

impl Module {
    /// The path where the module is symlinked into the base tree.
    pub fn location(&self) -> PathBuf {
        Path::new(&self.prefix).join(&self.name)
    }

    /// Local directory name for the shared clone, derived from the remote
    /// URL (last path segment, `.git` suffix stripped).
    pub fn repository_name(&self) -> Option<&str> {
        self.repo
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .map(|segment| segment.trim_end_matches(".git"))
            .filter(|segment| !segment.is_empty())
    }
}

/// A unit of orchestration: the base repo or one enabled module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// [`BASE_REPO`] for the base repository, otherwise the module name.
    pub name: String,
    /// Location of the repository. `None` means the process's current
    /// working directory (the base repository).
    pub directory: Option<PathBuf>,
    /// Branch a pull request or merge should target.
    pub target_branch: String,
}

impl Repository {
    /// Create an instance representing the base repository.
    pub fn base_repo(branch: &str) -> Self {
        Self {
            name: BASE_REPO.to_string(),
            directory: None,
            target_branch: branch.to_string(),
        }
    }

    /// Create an instance representing an enabled module repository.
    pub fn from_module(module: &Module) -> Self {
        Self {
            name: module.name.clone(),
            directory: Some(module.location()),
            target_branch: module.branch.clone(),
        }
    }
}

/// Per-repository outcome of a fanned-out git command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommandOutput {
    /// Name of the repository where the command was executed.
    pub repo_name: String,
    /// Output of the command.
    pub output: String,
}

impl GitCommandOutput {
    pub fn new(repo_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            output: output.into(),
        }
    }
}

/// A pull request created for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    /// Name of the repository the pull request belongs to.
    pub name: String,
    /// URL of the pull request on the code host.
    pub link: String,
}

impl PullRequestRecord {
    /// Render a markdown list entry pointing at this pull request.
    pub fn comment_line(&self) -> String {
        format!("* [{}]({})", self.name, self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> Module {
        Module {
            name: "enterprise".to_string(),
            repo: "git@github.com:org/enterprise-modules.git".to_string(),
            branch: "master".to_string(),
            prefix: "src/modules".to_string(),
        }
    }

    #[test]
    fn test_module_location_joins_prefix_and_name() {
        assert_eq!(
            module().location(),
            PathBuf::from("src/modules/enterprise")
        );
    }

    #[test]
    fn test_repository_name_strips_git_suffix() {
        assert_eq!(module().repository_name(), Some("enterprise-modules"));
    }

    #[test]
    fn test_repository_name_handles_https_urls() {
        let mut m = module();
        m.repo = "https://github.com/org/wiredtiger".to_string();
        assert_eq!(m.repository_name(), Some("wiredtiger"));
    }

    #[test]
    fn test_repository_name_rejects_empty_url() {
        let mut m = module();
        m.repo = String::new();
        assert_eq!(m.repository_name(), None);
    }

    #[test]
    fn test_base_repo_has_no_directory() {
        let repo = Repository::base_repo("master");
        assert_eq!(repo.name, "base");
        assert_eq!(repo.directory, None);
        assert_eq!(repo.target_branch, "master");
    }

    #[test]
    fn test_from_module_points_at_link_location() {
        let repo = Repository::from_module(&module());
        assert_eq!(repo.name, "enterprise");
        assert_eq!(
            repo.directory,
            Some(PathBuf::from("src/modules/enterprise"))
        );
        assert_eq!(repo.target_branch, "master");
    }

    #[test]
    fn test_pull_request_comment_line() {
        let pr = PullRequestRecord {
            name: "base".to_string(),
            link: "https://github.com/org/repo/pull/1".to_string(),
        };
        assert_eq!(
            pr.comment_line(),
            "* [base](https://github.com/org/repo/pull/1)"
        );
    }

    #[test]
    fn test_module_deserializes_from_project_config_yaml() {
        let yaml = r#"
name: enterprise
repo: git@github.com:org/enterprise-modules.git
branch: master
prefix: src/modules
"#;
        let m: Module = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(m, module());
    }
}
