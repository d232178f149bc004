//! # Modlink Library
//!
//! Core functionality for coordinating a base source repository with
//! optional sibling repositories ("modules") that are symlinked into the
//! base tree. It is designed to be used by the `modlink` command-line tool
//! but can also be integrated into other applications that orchestrate
//! multi-repository workflows.
//!
//! ## Core Concepts
//!
//! - **Registry (`registry`)**: Which modules the project declares, and
//!   which are enabled locally. Enabled state is a filesystem predicate
//!   (does the symlink exist?), recomputed on every query.
//! - **Manifest (`manifest`)**: The build system's record of which module
//!   revision was tested with which base-repo revision, resolved at the
//!   merge-base of the project branch and local HEAD.
//! - **Lifecycle (`lifecycle`)**: Enabling (clone + symlink), disabling
//!   (symlink removal), and syncing modules to manifest-pinned revisions.
//! - **Multi-repo git (`multi_git`)**: Fanning git operations out over the
//!   base repo and every enabled module, with error-tolerant and
//!   abort-on-first-failure disciplines chosen per operation.
//! - **Pull requests (`pull_requests`)** and **patches (`patch`)**:
//!   submitting the cross-repository change set for review and testing.
//!
//! External effects all flow through traits (`VcsClient`, `BuildService`,
//! `CodeHost`, `FileService`) whose production implementations shell out to
//! `git`, the build-system CLI, and `gh`; tests substitute recording fakes.

pub mod build;
pub mod codehost;
pub mod error;
pub mod fs_util;
pub mod lifecycle;
pub mod manifest;
pub mod model;
pub mod multi_git;
pub mod options;
pub mod output;
pub mod patch;
pub mod process;
pub mod pull_requests;
pub mod registry;
pub mod validation;
pub mod vcs;

#[cfg(test)]
mod test_support;
