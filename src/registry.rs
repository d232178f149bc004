//! # Module Registry
//!
//! Discovers which modules a project declares and which of them are enabled
//! in the local working tree.
//!
//! Module definitions come from the project's build configuration file
//! inside the base repository. Whether a module is enabled is never cached:
//! it is recomputed from the filesystem (does the symlink location exist?)
//! on every query, so the registry stays correct even when symlinks are
//! created or removed behind its back.

use std::collections::BTreeMap;

use crate::build::BuildService;
use crate::error::{Error, Result};
use crate::fs_util::FileService;
use crate::model::{Module, Repository};

/// Shape of the project build configuration file, reduced to the part this
/// tool reads.
#[derive(Debug, Default, serde::Deserialize)]
struct ProjectConfig {
    #[serde(default)]
    modules: Option<Vec<Module>>,
}

/// Looks up module definitions and their enabled state.
pub struct ModuleRegistry<'a> {
    build: &'a dyn BuildService,
    fs: &'a dyn FileService,
    project_id: String,
}

impl<'a> ModuleRegistry<'a> {
    pub fn new(build: &'a dyn BuildService, fs: &'a dyn FileService, project_id: &str) -> Self {
        Self {
            build,
            fs,
            project_id: project_id.to_string(),
        }
    }

    /// All modules the project declares, keyed by name.
    ///
    /// Sourced from the build configuration file within the base repo; a
    /// config with no modules section yields an empty map.
    pub fn module_definitions(&self) -> Result<BTreeMap<String, Module>> {
        let path = self.build.project_config_location(&self.project_id)?;
        if !self.fs.path_exists(&path) {
            return Err(Error::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = self.fs.read_to_string(&path)?;
        let config: ProjectConfig =
            serde_yaml::from_str(&contents).map_err(|e| Error::ConfigParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(config
            .modules
            .unwrap_or_default()
            .into_iter()
            .map(|m| (m.name.clone(), m))
            .collect())
    }

    /// Look up a single module by name.
    pub fn module(&self, name: &str) -> Result<Module> {
        self.module_definitions()?
            .remove(name)
            .ok_or_else(|| Error::ModuleUnknown {
                module: name.to_string(),
            })
    }

    /// Whether the module is currently linked into the base tree.
    pub fn is_enabled(&self, module: &Module) -> bool {
        self.fs.path_exists(&module.location())
    }

    /// Modules of the project, optionally restricted to enabled ones.
    pub fn all_modules(&self, enabled_only: bool) -> Result<BTreeMap<String, Module>> {
        let mut modules = self.module_definitions()?;
        if enabled_only {
            modules.retain(|_, module| self.is_enabled(module));
        }
        Ok(modules)
    }

    /// The repositories a fanned-out git operation runs over: every enabled
    /// module in name order, then the base repository last.
    ///
    /// The base goes last so that when an operation fails partway through,
    /// the base repo - the one the user is standing in - has not been
    /// touched yet unless every module already succeeded.
    pub fn collect_repositories(&self) -> Result<Vec<Repository>> {
        let enabled = self.all_modules(true)?;
        self.repositories_from(enabled.values())
    }

    /// Like [`collect_repositories`](Self::collect_repositories), but
    /// restricted to the named modules. Unknown names are an error; the base
    /// repository is still included last.
    pub fn collect_repositories_for(&self, module_names: &[String]) -> Result<Vec<Repository>> {
        let definitions = self.module_definitions()?;
        let mut selected = BTreeMap::new();
        for name in module_names {
            let module = definitions
                .get(name)
                .ok_or_else(|| Error::ModuleUnknown {
                    module: name.clone(),
                })?;
            selected.insert(name.clone(), module.clone());
        }
        self.repositories_from(selected.values())
    }

    fn repositories_from<'m>(
        &self,
        modules: impl Iterator<Item = &'m Module>,
    ) -> Result<Vec<Repository>> {
        let mut repositories: Vec<Repository> = modules.map(Repository::from_module).collect();
        let base_branch = self.build.project_branch(&self.project_id)?;
        repositories.push(Repository::base_repo(&base_branch));
        Ok(repositories)
    }
}
