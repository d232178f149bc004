//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `modlink` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! The variants fall into a few families that are treated differently by the
//! orchestration layer:
//!
//! - **Configuration errors** (`ConfigNotFound`, `ConfigParse`,
//!   `ModuleUnknown`, `ProjectNotSpecified`): user or environment setup
//!   problems. Surfaced immediately, the operation is never attempted.
//!
//! - **Precondition errors** (`AlreadyEnabled`, `NotEnabled`,
//!   `ProtectedBranchPush`, `ProtectedRemote`, `AmbiguousRemote`,
//!   `UnknownRemote`): the requested state transition is unsafe or redundant.
//!   Surfaced before any side effects occur.
//!
//! - **Consistency errors** (`ManifestMissing`, `ModuleNotInManifest`): the
//!   build system's record of truth cannot support a safe sync. Always fatal
//!   to the sync of the affected module; never guessed or defaulted.
//!
//! - **External command errors** (`GitCommand`, `BuildCommand`,
//!   `CodeHostCommand`, `UnrecognizedOutput`): a wrapped CLI exited non-zero
//!   or produced output we could not interpret. During error-tolerant
//!   fan-outs these are caught per repository and reported in aggregate.
//!
//! - **Environment errors** (`ToolMissing`, `NotAuthenticated`): a required
//!   external executable or credential is absent. Checked proactively so the
//!   user gets an actionable message instead of a raw spawn failure.

use thiserror::Error;

/// Main error type for modlink operations
#[derive(Error, Debug)]
pub enum Error {
    /// The project configuration file could not be located on disk.
    #[error("Project configuration not found: {path}")]
    ConfigNotFound { path: String },

    /// The project configuration file exists but could not be parsed.
    #[error("Configuration parsing error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// No project was given on the command line, in the environment, or in
    /// the saved defaults file.
    #[error(
        "No project specified\n  hint: Use --project, set MODLINK_PROJECT, or add 'project:' to ~/.modlink.yml"
    )]
    ProjectNotSpecified,

    /// The requested module is not declared in the project configuration.
    #[error("Could not find module '{module}' in the project configuration")]
    ModuleUnknown { module: String },

    /// An `enable` was requested for a module whose link path already exists.
    ///
    /// Enabling twice is an error rather than a no-op: a stale symlink
    /// pointing somewhere else would otherwise be silently hidden.
    #[error("Module '{module}' already exists at {location}")]
    AlreadyEnabled { module: String, location: String },

    /// A `disable` was requested for a module that is not enabled.
    #[error("Module '{module}' does not exist at {location}")]
    NotEnabled { module: String, location: String },

    /// The build manifest has no modules section at all.
    ///
    /// This signals a fundamentally broken or outdated manifest; the entire
    /// sync operation is unsafe, not just one module's.
    #[error("Modules not found in manifest")]
    ManifestMissing,

    /// A specific module is absent from an otherwise valid manifest.
    ///
    /// This signals drift between the project's module list and what was
    /// actually tested; only the affected module's sync is unsafe.
    #[error("Module not found in manifest: {module}")]
    ModuleNotInManifest { module: String },

    /// A push was refused because the current branch is protected.
    #[error("Refusing to push changes to protected branch '{branch}' in '{directory}'")]
    ProtectedBranchPush { branch: String, directory: String },

    /// A push was refused because the resolved remote is a protected
    /// upstream.
    #[error("Refusing to push to protected remote '{remote}' ({url})")]
    ProtectedRemote { remote: String, url: String },

    /// The requested remote alias matched more than one configured remote.
    #[error("Remote '{remote}' is ambiguous, candidates: {candidates}")]
    AmbiguousRemote { remote: String, candidates: String },

    /// The requested remote did not match any configured remote.
    #[error("No remote matching '{remote}' found in '{directory}'")]
    UnknownRemote { remote: String, directory: String },

    /// A git invocation exited with a non-zero status.
    #[error("git {command} failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    /// A build-system CLI invocation exited with a non-zero status.
    #[error("Build CLI command failed: {command} - {stderr}")]
    BuildCommand { command: String, stderr: String },

    /// A code-hosting CLI invocation exited with a non-zero status.
    #[error("gh {command} failed: {stderr}")]
    CodeHostCommand { command: String, stderr: String },

    /// Output from an external command could not be interpreted.
    #[error("Could not recognize output from '{command}':\n{output}")]
    UnrecognizedOutput { command: String, output: String },

    /// A required external executable is not available on the PATH.
    #[error("Cannot find '{tool}' command. {hint}")]
    ToolMissing { tool: String, hint: String },

    /// The code-hosting CLI is installed but not authenticated.
    #[error("Not authenticated to the code host. Run 'gh auth login' to authenticate")]
    NotAuthenticated,

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
