//! Code-hosting client: wraps the GitHub CLI (`gh`) for pull request
//! creation, PR comments, and authentication checks.

use std::path::Path;

use crate::error::{Error, Result};
use crate::process;

/// Trait over the code-hosting operations the pull-request orchestrator
/// needs - allows mocking in tests.
pub trait CodeHost {
    /// Create a pull request from the current branch of the repository at
    /// `directory`, returning its URL. `extra_args` are forwarded to the
    /// underlying CLI (`--title`/`--body`).
    fn create_pull_request(&self, extra_args: &[String], directory: Option<&Path>)
        -> Result<String>;

    /// Add a comment to an existing pull request.
    fn comment_on_pull_request(
        &self,
        pr_url: &str,
        comment: &str,
        directory: Option<&Path>,
    ) -> Result<()>;

    /// Whether the CLI is authenticated to the code host.
    fn check_authenticated(&self) -> Result<bool>;
}

/// `CodeHost` implementation that shells out to the `gh` binary.
#[derive(Debug, Default)]
pub struct GhCli;

impl GhCli {
    fn run(&self, args: &[String], directory: Option<&Path>) -> Result<String> {
        process::run("gh", args, directory).map_err(|e| Error::CodeHostCommand {
            command: e.command,
            stderr: e.stderr,
        })
    }
}

impl CodeHost for GhCli {
    fn create_pull_request(
        &self,
        extra_args: &[String],
        directory: Option<&Path>,
    ) -> Result<String> {
        let mut args = vec!["pr".to_string(), "create".to_string()];
        args.extend(extra_args.iter().cloned());
        let output = self.run(&args, directory)?;
        Ok(output.trim().to_string())
    }

    fn comment_on_pull_request(
        &self,
        pr_url: &str,
        comment: &str,
        directory: Option<&Path>,
    ) -> Result<()> {
        let args = vec![
            "pr".to_string(),
            "comment".to_string(),
            pr_url.to_string(),
            "--body".to_string(),
            comment.to_string(),
        ];
        self.run(&args, directory)?;
        Ok(())
    }

    fn check_authenticated(&self) -> Result<bool> {
        // `gh auth status` exits non-zero when unauthenticated; that is a
        // negative answer, not a command failure.
        match self.run(&["auth".to_string(), "status".to_string()], None) {
            Ok(_) => Ok(true),
            Err(Error::CodeHostCommand { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
