//! # Manifest Resolution
//!
//! The build system records, for every base-repo commit it has built, the
//! exact revision each module was tested against. This module resolves that
//! record into a per-module target revision.
//!
//! The manifest is looked up at `merge-base(project_branch, HEAD)` of the
//! base repository rather than at HEAD directly: that ties every module's
//! target revision to the last point where the base repo's history diverged
//! from its tracked upstream branch, so modules sync to a build-verified
//! combination instead of to arbitrary in-progress base-repo commits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::build::BuildService;
use crate::error::{Error, Result};
use crate::vcs::VcsClient;

/// A pinned module revision within a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestModule {
    /// VCS commit the module was tested against.
    pub revision: String,
}

/// Build-system record mapping module name to its pinned revision for one
/// base-repo revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Pinned modules; `None` on fundamentally broken or pre-module
    /// manifests.
    pub modules: Option<BTreeMap<String, ManifestModule>>,
}

/// Resolves manifest-pinned revisions for a project.
pub struct ManifestResolver<'a> {
    vcs: &'a dyn VcsClient,
    build: &'a dyn BuildService,
    project_id: String,
}

impl<'a> ManifestResolver<'a> {
    pub fn new(vcs: &'a dyn VcsClient, build: &'a dyn BuildService, project_id: &str) -> Self {
        Self {
            vcs,
            build,
            project_id: project_id.to_string(),
        }
    }

    /// Fetch the manifest pinned at the merge-base of the project branch and
    /// the base repo's current HEAD.
    pub fn manifest_for_project(&self) -> Result<Manifest> {
        let project_branch = self.build.project_branch(&self.project_id)?;
        let base_revision = self.vcs.merge_base(&project_branch, "HEAD", None)?;
        log::debug!(
            "resolving manifest for {} at {}",
            self.project_id,
            base_revision
        );
        self.build.manifest(&self.project_id, &base_revision)
    }

    /// Fetch the manifest pinned at an explicit base-repo commit.
    pub fn manifest_at(&self, revision: &str) -> Result<Manifest> {
        self.build.manifest(&self.project_id, revision)
    }

    /// Look up the pinned revision for one module.
    ///
    /// A manifest with no modules section at all is `ManifestMissing` (the
    /// whole sync is unsafe); a module absent from an otherwise valid
    /// manifest is `ModuleNotInManifest` (only that module's sync is
    /// unsafe). The distinction matters to callers deciding whether to
    /// abort everything or report one module.
    pub fn resolve_module_revision(manifest: &Manifest, module_name: &str) -> Result<String> {
        let modules = manifest.modules.as_ref().ok_or(Error::ManifestMissing)?;
        let entry = modules
            .get(module_name)
            .ok_or_else(|| Error::ModuleNotInManifest {
                module: module_name.to_string(),
            })?;
        Ok(entry.revision.clone())
    }
}
