//! # Invocation Options
//!
//! Resolved configuration for one command invocation: which build-system
//! project the base repository belongs to, where shared module clones live,
//! and which binary to use for the build-system CLI.
//!
//! Values are resolved in priority order: CLI flag (or its environment
//! variable, handled by clap), then the saved defaults file
//! (`~/.modlink.yml`), then the built-in default. The project has no
//! built-in default and must come from one of the first two.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default directory for shared module clones: siblings of the base repo.
pub const DEFAULT_MODULES_PATH: &str = "..";
/// Default binary name of the build-system CLI.
pub const DEFAULT_BUILD_CLI: &str = "evergreen";
/// File name of the saved defaults file in the home directory.
pub const DEFAULTS_FILE_NAME: &str = ".modlink.yml";

/// Fully resolved options for one command invocation.
#[derive(Debug, Clone)]
pub struct Options {
    /// Build-system project of the base repository.
    pub project: String,
    /// Directory shared module clones are placed in.
    pub modules_directory: PathBuf,
    /// Binary name of the build-system CLI.
    pub build_cli: String,
}

impl Options {
    /// Resolve options from CLI-provided values and the saved defaults.
    pub fn resolve(
        project: Option<String>,
        modules_dir: Option<PathBuf>,
        build_cli: Option<String>,
        saved: &SavedDefaults,
    ) -> Result<Self> {
        let project = project
            .or_else(|| saved.project.clone())
            .ok_or(Error::ProjectNotSpecified)?;
        let modules_directory = modules_dir
            .or_else(|| saved.modules_directory.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODULES_PATH));
        let build_cli = build_cli
            .or_else(|| saved.build_cli.clone())
            .unwrap_or_else(|| DEFAULT_BUILD_CLI.to_string());
        Ok(Self {
            project,
            modules_directory,
            build_cli,
        })
    }
}

/// Optional defaults saved in the user's home directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedDefaults {
    /// Default project to run against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Default directory for shared module clones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules_directory: Option<String>,
    /// Default binary name of the build-system CLI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_cli: Option<String>,
}

impl SavedDefaults {
    /// Location of the saved defaults file, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULTS_FILE_NAME))
    }

    /// Read saved defaults from the given file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Load the defaults file if it exists; absence is not an error.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_yaml_file(&path),
            _ => Ok(Self::default()),
        }
    }
}
