//! # Module Lifecycle
//!
//! Enabling, disabling, and syncing modules.
//!
//! A module is *enabled* by symlinking a shared clone into the base tree at
//! the module's configured location. The clone itself lives in the shared
//! modules directory (siblings of the base repo by default) so several base
//! checkouts can reuse it; disabling a module only removes the symlink and
//! never touches the clone.
//!
//! Syncing moves a module's working tree to the revision the build system's
//! manifest pins for the current base-repo state. The fetch always happens
//! before the move so the pinned revision is present locally.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::fs_util::FileService;
use crate::manifest::{Manifest, ManifestResolver};
use crate::model::Module;
use crate::registry::ModuleRegistry;
use crate::vcs::{GitAction, VcsClient};

/// Orchestrates enable, disable, and sync of modules.
pub struct ModuleLifecycle<'a> {
    registry: &'a ModuleRegistry<'a>,
    resolver: &'a ManifestResolver<'a>,
    vcs: &'a dyn VcsClient,
    fs: &'a dyn FileService,
    modules_directory: PathBuf,
}

impl<'a> ModuleLifecycle<'a> {
    pub fn new(
        registry: &'a ModuleRegistry<'a>,
        resolver: &'a ManifestResolver<'a>,
        vcs: &'a dyn VcsClient,
        fs: &'a dyn FileService,
        modules_directory: PathBuf,
    ) -> Self {
        Self {
            registry,
            resolver,
            vcs,
            fs,
            modules_directory,
        }
    }

    /// Directory the shared clone of a module lives in.
    fn clone_directory(&self, module: &Module) -> PathBuf {
        let name = module.repository_name().unwrap_or(&module.name);
        self.modules_directory.join(name)
    }

    /// Enable a module: clone it into the shared modules directory if no
    /// clone exists yet, then symlink the clone into the base tree. With
    /// `sync`, afterwards move the module to its manifest-pinned revision.
    pub fn enable(&self, module_name: &str, sync: bool) -> Result<Module> {
        let module = self.registry.module(module_name)?;
        if self.registry.is_enabled(&module) {
            return Err(Error::AlreadyEnabled {
                module: module.name.clone(),
                location: module.location().display().to_string(),
            });
        }

        let clone_dir = self.clone_directory(&module);
        if !self.fs.path_exists(&clone_dir) {
            log::info!(
                "cloning {} into {}",
                module.repo,
                self.modules_directory.display()
            );
            self.fs.mkdirs(&self.modules_directory)?;
            let name = module.repository_name().unwrap_or(&module.name);
            self.vcs.clone_repo(
                name,
                &module.repo,
                &self.modules_directory,
                Some(&module.branch),
            )?;
        }

        let location = module.location();
        if let Some(parent) = location.parent() {
            self.fs.mkdirs(parent)?;
        }
        // Canonicalize so the link survives invocations from other cwds.
        let target = self.fs.canonicalize(&clone_dir)?;
        self.fs.create_symlink(&location, &target)?;
        log::info!("enabled {} at {}", module.name, location.display());

        if sync {
            let manifest = self.resolver.manifest_for_project()?;
            self.sync_module(&module, &manifest, GitAction::default(), None)?;
        }
        Ok(module)
    }

    /// Disable a module by removing its symlink. The shared clone and any
    /// local work in it are left alone.
    pub fn disable(&self, module_name: &str) -> Result<Module> {
        let module = self.registry.module(module_name)?;
        if !self.registry.is_enabled(&module) {
            return Err(Error::NotEnabled {
                module: module.name.clone(),
                location: module.location().display().to_string(),
            });
        }
        self.fs.rm_symlink(&module.location())?;
        log::info!("disabled {}", module.name);
        Ok(module)
    }

    /// Manifest pinned for the current base-repo state.
    pub fn current_manifest(&self) -> Result<Manifest> {
        self.resolver.manifest_for_project()
    }

    /// Move one module to its manifest-pinned revision, fetching first so
    /// the revision is present locally. Returns the revision synced to.
    pub fn sync_module(
        &self,
        module: &Module,
        manifest: &Manifest,
        action: GitAction,
        branch_name: Option<&str>,
    ) -> Result<String> {
        let revision = ManifestResolver::resolve_module_revision(manifest, &module.name)?;
        let location = module.location();
        self.vcs.fetch(Some(&location))?;
        self.vcs
            .perform_action(action, &revision, branch_name, Some(&location))?;
        log::info!("synced {} to {} ({})", module.name, revision, action);
        Ok(revision)
    }

    /// Sync every enabled module against the manifest for the current
    /// base-repo state. Returns `(module, revision)` pairs in name order.
    pub fn sync_all_enabled(
        &self,
        action: GitAction,
        branch_name: Option<&str>,
    ) -> Result<Vec<(String, String)>> {
        let enabled = self.registry.all_modules(true)?;
        if enabled.is_empty() {
            return Ok(Vec::new());
        }
        let manifest = self.resolver.manifest_for_project()?;
        let mut synced = Vec::with_capacity(enabled.len());
        for module in enabled.values() {
            let revision = self.sync_module(module, &manifest, action, branch_name)?;
            synced.push((module.name.clone(), revision));
        }
        Ok(synced)
    }
}
