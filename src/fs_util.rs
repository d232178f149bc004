//! # Filesystem Access
//!
//! This module defines the `FileService` trait, the seam through which the
//! module lifecycle and registry touch the filesystem. The trait-based
//! design mirrors the way git and the build CLI are abstracted: the real
//! implementation (`LocalFs`) performs actual filesystem operations, while
//! tests substitute an in-memory fake to verify symlink and clone behavior
//! without touching disk.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Filesystem operations needed by the module lifecycle - allows mocking in
/// tests.
pub trait FileService {
    /// Determine if the given path exists (symlink or otherwise).
    fn path_exists(&self, path: &Path) -> bool;

    /// Create the given directory and any missing parents.
    fn mkdirs(&self, path: &Path) -> Result<()>;

    /// Create a symlink at `link` pointing to `target`.
    fn create_symlink(&self, link: &Path, target: &Path) -> Result<()>;

    /// Remove the symlink at `link` without touching its target.
    fn rm_symlink(&self, link: &Path) -> Result<()>;

    /// Resolve a path to its canonical absolute form.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Read the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Find the path to the given command on the PATH, if it exists.
    fn which(&self, command: &str) -> Option<PathBuf>;
}

/// `FileService` implementation backed by the real filesystem.
#[derive(Debug, Default)]
pub struct LocalFs;

impl FileService for LocalFs {
    fn path_exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling symlink still counts as "exists"
        path.symlink_metadata().is_ok()
    }

    fn mkdirs(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    #[cfg(unix)]
    fn create_symlink(&self, link: &Path, target: &Path) -> Result<()> {
        std::os::unix::fs::symlink(target, link)?;
        Ok(())
    }

    #[cfg(windows)]
    fn create_symlink(&self, link: &Path, target: &Path) -> Result<()> {
        std::os::windows::fs::symlink_dir(target, link)?;
        Ok(())
    }

    fn rm_symlink(&self, link: &Path) -> Result<()> {
        std::fs::remove_file(link)?;
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(std::fs::canonicalize(path)?)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn which(&self, command: &str) -> Option<PathBuf> {
        let path_var = std::env::var_os("PATH")?;
        for dir in std::env::split_paths(&path_var) {
            let candidate = dir.join(command);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}
