//! Proactive environment checks: the wrapped external CLIs must exist on
//! the PATH (and `gh` must be authenticated) before a command that needs
//! them runs, so users get an actionable message instead of a raw spawn
//! failure halfway through an operation.

use crate::codehost::CodeHost;
use crate::error::{Error, Result};
use crate::fs_util::FileService;

/// Validates the availability of the external tools a command depends on.
pub struct ValidationService<'a> {
    fs: &'a dyn FileService,
    host: &'a dyn CodeHost,
}

impl<'a> ValidationService<'a> {
    pub fn new(fs: &'a dyn FileService, host: &'a dyn CodeHost) -> Self {
        Self { fs, host }
    }

    fn require_tool(&self, tool: &str, hint: &str) -> Result<()> {
        if self.fs.which(tool).is_none() {
            return Err(Error::ToolMissing {
                tool: tool.to_string(),
                hint: hint.to_string(),
            });
        }
        Ok(())
    }

    /// Git is needed by every command.
    pub fn validate_git(&self) -> Result<()> {
        self.require_tool("git", "Please install git and ensure it is on your PATH.")
    }

    /// The build-system CLI, under its configured binary name.
    pub fn validate_build_cli(&self, binary: &str) -> Result<()> {
        self.require_tool(
            binary,
            "Please install the build-system CLI and ensure it is on your PATH.",
        )
    }

    /// The GitHub CLI must exist and be authenticated.
    pub fn validate_code_host(&self) -> Result<()> {
        self.require_tool(
            "gh",
            "Please install the GitHub CLI: https://cli.github.com/manual/installation",
        )?;
        if !self.host.check_authenticated()? {
            return Err(Error::NotAuthenticated);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeFs, FakeHost};

    #[test]
    fn test_all_tools_present_and_authenticated() {
        let fs = FakeFs::default();
        let host = FakeHost::authenticated();
        let validation = ValidationService::new(&fs, &host);

        assert!(validation.validate_git().is_ok());
        assert!(validation.validate_build_cli("evergreen").is_ok());
        assert!(validation.validate_code_host().is_ok());
    }

    #[test]
    fn test_missing_git() {
        let fs = FakeFs::default();
        fs.missing_commands.borrow_mut().insert("git".to_string());
        let host = FakeHost::authenticated();
        let validation = ValidationService::new(&fs, &host);

        let err = validation.validate_git().unwrap_err();
        assert!(matches!(err, Error::ToolMissing { tool, .. } if tool == "git"));
    }

    #[test]
    fn test_missing_build_cli_reports_configured_binary() {
        let fs = FakeFs::default();
        fs.missing_commands
            .borrow_mut()
            .insert("custom-evg".to_string());
        let host = FakeHost::authenticated();
        let validation = ValidationService::new(&fs, &host);

        let err = validation.validate_build_cli("custom-evg").unwrap_err();
        assert!(matches!(err, Error::ToolMissing { tool, .. } if tool == "custom-evg"));
    }

    #[test]
    fn test_unauthenticated_code_host() {
        let fs = FakeFs::default();
        let host = FakeHost::default();
        let validation = ValidationService::new(&fs, &host);

        let err = validation.validate_code_host().unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
    }

    #[test]
    fn test_missing_gh_beats_authentication_check() {
        let fs = FakeFs::default();
        fs.missing_commands.borrow_mut().insert("gh".to_string());
        let host = FakeHost::default();
        let validation = ValidationService::new(&fs, &host);

        let err = validation.validate_code_host().unwrap_err();
        assert!(matches!(err, Error::ToolMissing { tool, .. } if tool == "gh"));
    }
}
