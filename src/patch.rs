//! # Patch Submission
//!
//! Submits the local change set to the hosted build system as a patch build
//! or a commit-queue entry. The base repo's changes go into the patch
//! itself; every enabled module's changes are attached afterwards from the
//! module's own directory. Commit-queue entries are created paused and
//! resumed once all modules are attached, so a partially assembled entry
//! never starts merging.

use crate::build::{BuildService, PatchInfo};
use crate::error::Result;
use crate::registry::ModuleRegistry;

/// Assembles patch and commit-queue submissions across repositories.
pub struct PatchOrchestrator<'a> {
    build: &'a dyn BuildService,
    registry: &'a ModuleRegistry<'a>,
    project_id: String,
}

impl<'a> PatchOrchestrator<'a> {
    pub fn new(
        build: &'a dyn BuildService,
        registry: &'a ModuleRegistry<'a>,
        project_id: &str,
    ) -> Self {
        Self {
            build,
            registry,
            project_id: project_id.to_string(),
        }
    }

    /// Create a patch build and attach every enabled module's changes.
    /// `extra_args` are forwarded to the build CLI.
    pub fn create_patch(&self, extra_args: &[String]) -> Result<PatchInfo> {
        let patch = self.build.create_patch(&self.project_id, extra_args)?;
        for module in self.registry.all_modules(true)?.values() {
            log::info!("attaching {} to patch {}", module.name, patch.patch_id);
            self.build.add_module_to_patch(
                &patch.patch_id,
                &module.name,
                &module.location(),
                extra_args,
            )?;
        }
        Ok(patch)
    }

    /// Create a paused commit-queue entry, attach every enabled module's
    /// changes, then resume it.
    pub fn create_cq_patch(&self, extra_args: &[String]) -> Result<PatchInfo> {
        let patch = self.build.create_cq_patch(&self.project_id, extra_args)?;
        for module in self.registry.all_modules(true)?.values() {
            log::info!(
                "attaching {} to commit-queue entry {}",
                module.name,
                patch.patch_id
            );
            self.build.add_module_to_cq_patch(
                &patch.patch_id,
                &module.name,
                &module.location(),
                extra_args,
            )?;
        }
        self.build.finalize_cq_patch(&patch.patch_id)?;
        Ok(patch)
    }
}
