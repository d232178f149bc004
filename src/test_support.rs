//! Shared recording fakes for the orchestration tests.
//!
//! These implement the external-collaborator traits (`VcsClient`,
//! `BuildService`, `CodeHost`, `FileService`) in memory, recording every
//! call so tests can assert on ordering and arguments without spawning real
//! subprocesses or touching a real working tree.
//!
//! Call log entries are colon-joined: the operation name, then the working
//! directory key (`BASE` for the base repository), then operation-specific
//! arguments. A `-` stands in for an omitted optional argument.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::build::{BuildService, PatchInfo};
use crate::codehost::CodeHost;
use crate::error::{Error, Result};
use crate::fs_util::FileService;
use crate::manifest::{Manifest, ManifestModule};
use crate::model::Module;
use crate::vcs::{Remote, VcsClient, PROTECTED_BRANCHES};

/// Key used in call logs for the base repository (no explicit directory).
pub fn dir_key(directory: Option<&Path>) -> String {
    directory
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "BASE".to_string())
}

/// Build a module fixture linked under `src/modules`.
pub fn module_fixture(name: &str) -> Module {
    Module {
        name: name.to_string(),
        repo: format!("git@github.com:org/{}.git", name),
        branch: "master".to_string(),
        prefix: "src/modules".to_string(),
    }
}

/// Build a manifest pinning the given `(module, revision)` pairs.
pub fn manifest_with(entries: &[(&str, &str)]) -> Manifest {
    Manifest {
        modules: Some(
            entries
                .iter()
                .map(|(name, rev)| {
                    (
                        name.to_string(),
                        ManifestModule {
                            revision: rev.to_string(),
                        },
                    )
                })
                .collect(),
        ),
    }
}

/// Render a project config YAML document declaring the given modules.
pub fn project_config_yaml(modules: &[Module]) -> String {
    #[derive(serde::Serialize)]
    struct Doc<'a> {
        modules: &'a [Module],
    }
    serde_yaml::to_string(&Doc { modules }).unwrap()
}

/// Recording fake for [`VcsClient`].
pub struct FakeVcs {
    /// Every call in invocation order.
    pub calls: RefCell<Vec<String>>,
    /// `"op"` or `"op:key"` entries that should fail with a git error.
    pub fail: RefCell<HashSet<String>>,
    /// Short-form status output per directory key.
    pub short_status: RefCell<HashMap<String, String>>,
    /// Long-form status output (same for every repository).
    pub long_status: String,
    /// `ls-files` output per directory key.
    pub ls_files: RefCell<HashMap<String, Vec<String>>>,
    /// Directory keys where a diff against the target branch is non-empty.
    pub changed: RefCell<HashSet<String>>,
    /// Branch reported as currently checked out.
    pub current_branch: RefCell<String>,
    /// Raw `git branch` output.
    pub branch_output: String,
    /// Configured remotes, same for every repository.
    pub remotes: RefCell<Vec<Remote>>,
    /// Subject line of the most recent commit.
    pub commit_subject: String,
}

impl FakeVcs {
    /// Merge-base every fake repository reports.
    pub const MERGE_BASE: &'static str = "mergebase-rev";
    /// HEAD commit every fake repository reports.
    pub const HEAD: &'static str = "head-rev";

    fn record(&self, entry: String) {
        self.calls.borrow_mut().push(entry);
    }

    fn maybe_fail(&self, op: &str, key: &str) -> Result<()> {
        let fail = self.fail.borrow();
        if fail.contains(op) || fail.contains(&format!("{}:{}", op, key)) {
            return Err(Error::GitCommand {
                command: op.to_string(),
                stderr: format!("{} failed in {}", op, key),
            });
        }
        Ok(())
    }

    /// Calls whose operation name matches `op`.
    pub fn calls_matching(&self, op: &str) -> Vec<String> {
        let prefix = format!("{}:", op);
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .cloned()
            .collect()
    }
}

impl Default for FakeVcs {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail: RefCell::new(HashSet::new()),
            short_status: RefCell::new(HashMap::new()),
            long_status: "On branch feature\nnothing to commit, working tree clean\n".to_string(),
            ls_files: RefCell::new(HashMap::new()),
            changed: RefCell::new(HashSet::new()),
            current_branch: RefCell::new("feature-branch".to_string()),
            branch_output: "* feature-branch\n  master\n".to_string(),
            remotes: RefCell::new(vec![
                Remote {
                    name: "origin".to_string(),
                    url: "git@github.com:me/fork.git".to_string(),
                },
                Remote {
                    name: "upstream".to_string(),
                    url: "git@github.com:org/base.git".to_string(),
                },
            ]),
            commit_subject: "Fix the flux capacitor".to_string(),
        }
    }
}

impl VcsClient for FakeVcs {
    fn clone_repo(
        &self,
        name: &str,
        remote_url: &str,
        parent_dir: &Path,
        branch: Option<&str>,
    ) -> Result<()> {
        self.record(format!(
            "clone:{}:{}:{}:{}",
            parent_dir.display(),
            name,
            remote_url,
            branch.unwrap_or("-")
        ));
        self.maybe_fail("clone", name)
    }

    fn fetch(&self, directory: Option<&Path>) -> Result<()> {
        let key = dir_key(directory);
        self.record(format!("fetch:{}", key));
        self.maybe_fail("fetch", &key)
    }

    fn pull(&self, rebase: bool, directory: Option<&Path>) -> Result<()> {
        let key = dir_key(directory);
        self.record(format!("pull:{}:{}", key, rebase));
        self.maybe_fail("pull", &key)
    }

    fn checkout(
        &self,
        revision: Option<&str>,
        directory: Option<&Path>,
        branch_name: Option<&str>,
    ) -> Result<()> {
        let key = dir_key(directory);
        self.record(format!(
            "checkout:{}:{}:{}",
            key,
            revision.unwrap_or("-"),
            branch_name.unwrap_or("-")
        ));
        self.maybe_fail("checkout", &key)
    }

    fn rebase(&self, onto: &str, directory: Option<&Path>) -> Result<()> {
        let key = dir_key(directory);
        self.record(format!("rebase:{}:{}", key, onto));
        self.maybe_fail("rebase", &key)
    }

    fn merge(&self, revision: &str, directory: Option<&Path>) -> Result<()> {
        let key = dir_key(directory);
        self.record(format!("merge:{}:{}", key, revision));
        self.maybe_fail("merge", &key)
    }

    fn status(&self, short: bool, directory: Option<&Path>) -> Result<String> {
        let key = dir_key(directory);
        self.record(format!("status:{}:{}", key, short));
        self.maybe_fail("status", &key)?;
        if short {
            Ok(self
                .short_status
                .borrow()
                .get(&key)
                .cloned()
                .unwrap_or_default())
        } else {
            Ok(self.long_status.clone())
        }
    }

    fn ls_files(
        &self,
        pathspecs: &[String],
        _cached: bool,
        _others: bool,
        ignore_file: Option<&str>,
        directory: Option<&Path>,
    ) -> Result<Vec<String>> {
        let key = dir_key(directory);
        self.record(format!(
            "ls-files:{}:{}:{}",
            key,
            pathspecs.join(","),
            ignore_file.unwrap_or("-")
        ));
        self.maybe_fail("ls-files", &key)?;
        Ok(self.ls_files.borrow().get(&key).cloned().unwrap_or_default())
    }

    fn add(&self, files: &[String], directory: Option<&Path>) -> Result<()> {
        let key = dir_key(directory);
        self.record(format!("add:{}:{}", key, files.join(",")));
        self.maybe_fail("add", &key)
    }

    fn restore(&self, files: &[String], staged: bool, directory: Option<&Path>) -> Result<()> {
        let key = dir_key(directory);
        self.record(format!("restore:{}:{}:{}", key, files.join(","), staged));
        self.maybe_fail("restore", &key)
    }

    fn branch(&self, delete: Option<&str>, directory: Option<&Path>) -> Result<String> {
        let key = dir_key(directory);
        self.record(format!("branch:{}:{}", key, delete.unwrap_or("-")));
        self.maybe_fail("branch", &key)?;
        Ok(self.branch_output.clone())
    }

    fn commit(
        &self,
        message: Option<&str>,
        amend: bool,
        add: bool,
        directory: Option<&Path>,
    ) -> Result<()> {
        let key = dir_key(directory);
        self.record(format!(
            "commit:{}:{}:{}:{}",
            key,
            message.unwrap_or("-"),
            amend,
            add
        ));
        self.maybe_fail("commit", &key)
    }

    fn current_branch(&self, directory: Option<&Path>) -> Result<String> {
        let key = dir_key(directory);
        self.record(format!("current-branch:{}", key));
        self.maybe_fail("current-branch", &key)?;
        Ok(self.current_branch.borrow().clone())
    }

    fn current_commit(&self, directory: Option<&Path>) -> Result<String> {
        let key = dir_key(directory);
        self.record(format!("current-commit:{}", key));
        self.maybe_fail("current-commit", &key)?;
        Ok(Self::HEAD.to_string())
    }

    fn merge_base(
        &self,
        commit_a: &str,
        commit_b: &str,
        directory: Option<&Path>,
    ) -> Result<String> {
        let key = dir_key(directory);
        self.record(format!("merge-base:{}:{}:{}", key, commit_a, commit_b));
        self.maybe_fail("merge-base", &key)?;
        Ok(Self::MERGE_BASE.to_string())
    }

    fn check_diff_between(&self, branch: &str, directory: Option<&Path>) -> Result<bool> {
        let key = dir_key(directory);
        self.record(format!("diff:{}:{}", key, branch));
        self.maybe_fail("diff", &key)?;
        Ok(self.changed.borrow().contains(&key))
    }

    fn latest_commit_message(&self, directory: Option<&Path>) -> Result<String> {
        let key = dir_key(directory);
        self.record(format!("log:{}", key));
        self.maybe_fail("log", &key)?;
        Ok(self.commit_subject.clone())
    }

    fn remotes(&self, directory: Option<&Path>) -> Result<Vec<Remote>> {
        let key = dir_key(directory);
        self.record(format!("remotes:{}", key));
        self.maybe_fail("remotes", &key)?;
        Ok(self.remotes.borrow().clone())
    }

    fn push_current_branch(&self, remote: &str, directory: Option<&Path>) -> Result<String> {
        let key = dir_key(directory);
        self.record(format!("push:{}:{}", key, remote));
        let branch = self.current_branch.borrow().clone();
        if PROTECTED_BRANCHES.contains(&branch.as_str()) {
            return Err(Error::ProtectedBranchPush {
                branch,
                directory: key,
            });
        }
        self.maybe_fail("push", &key)?;
        Ok(String::new())
    }
}

/// Recording fake for [`BuildService`].
pub struct FakeBuild {
    pub branch: String,
    pub config_location: PathBuf,
    pub manifest: RefCell<Manifest>,
    /// `(project, revision)` pairs for which the manifest was requested.
    pub manifest_requests: RefCell<Vec<(String, String)>>,
    /// Patch ids created, in order.
    pub created_patches: RefCell<Vec<String>>,
    /// `(kind, patch_id, module, directory)` module attachments.
    pub attachments: RefCell<Vec<(String, String, String, PathBuf)>>,
    /// `(kind, patch_id)` finalize calls.
    pub finalized: RefCell<Vec<(String, String)>>,
}

impl FakeBuild {
    pub fn new(branch: &str, manifest: Manifest) -> Self {
        Self {
            branch: branch.to_string(),
            config_location: PathBuf::from("etc/project.yml"),
            manifest: RefCell::new(manifest),
            manifest_requests: RefCell::new(Vec::new()),
            created_patches: RefCell::new(Vec::new()),
            attachments: RefCell::new(Vec::new()),
            finalized: RefCell::new(Vec::new()),
        }
    }

    fn next_patch(&self, kind: &str) -> PatchInfo {
        let id = format!("{}-{}", kind, self.created_patches.borrow().len() + 1);
        self.created_patches.borrow_mut().push(id.clone());
        PatchInfo {
            patch_url: format!("https://build.example.com/{}", id),
            patch_id: id,
        }
    }
}

impl BuildService for FakeBuild {
    fn project_config_location(&self, _project_id: &str) -> Result<PathBuf> {
        Ok(self.config_location.clone())
    }

    fn project_branch(&self, _project_id: &str) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn manifest(&self, project_id: &str, revision: &str) -> Result<Manifest> {
        self.manifest_requests
            .borrow_mut()
            .push((project_id.to_string(), revision.to_string()));
        Ok(self.manifest.borrow().clone())
    }

    fn create_patch(&self, _project_id: &str, _extra_args: &[String]) -> Result<PatchInfo> {
        Ok(self.next_patch("patch"))
    }

    fn add_module_to_patch(
        &self,
        patch_id: &str,
        module: &str,
        directory: &Path,
        _extra_args: &[String],
    ) -> Result<()> {
        self.attachments.borrow_mut().push((
            "patch".to_string(),
            patch_id.to_string(),
            module.to_string(),
            directory.to_path_buf(),
        ));
        Ok(())
    }

    fn create_cq_patch(&self, _project_id: &str, _extra_args: &[String]) -> Result<PatchInfo> {
        Ok(self.next_patch("cq"))
    }

    fn add_module_to_cq_patch(
        &self,
        patch_id: &str,
        module: &str,
        directory: &Path,
        _extra_args: &[String],
    ) -> Result<()> {
        self.attachments.borrow_mut().push((
            "cq".to_string(),
            patch_id.to_string(),
            module.to_string(),
            directory.to_path_buf(),
        ));
        Ok(())
    }

    fn finalize_cq_patch(&self, patch_id: &str) -> Result<()> {
        self.finalized
            .borrow_mut()
            .push(("cq".to_string(), patch_id.to_string()));
        Ok(())
    }
}

/// In-memory fake for [`FileService`].
#[derive(Default)]
pub struct FakeFs {
    /// Paths that exist.
    pub existing: RefCell<HashSet<PathBuf>>,
    /// File contents by path.
    pub files: RefCell<HashMap<PathBuf, String>>,
    /// `(link, target)` symlinks created.
    pub symlinks: RefCell<Vec<(PathBuf, PathBuf)>>,
    /// Symlinks removed.
    pub removed_links: RefCell<Vec<PathBuf>>,
    /// Directories created.
    pub created_dirs: RefCell<Vec<PathBuf>>,
    /// Commands `which` should report as missing.
    pub missing_commands: RefCell<HashSet<String>>,
}

impl FakeFs {
    pub fn add_existing(&self, path: impl Into<PathBuf>) {
        self.existing.borrow_mut().insert(path.into());
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let path = path.into();
        self.existing.borrow_mut().insert(path.clone());
        self.files.borrow_mut().insert(path, contents.into());
    }
}

impl FileService for FakeFs {
    fn path_exists(&self, path: &Path) -> bool {
        self.existing.borrow().contains(path)
    }

    fn mkdirs(&self, path: &Path) -> Result<()> {
        self.created_dirs.borrow_mut().push(path.to_path_buf());
        self.existing.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }

    fn create_symlink(&self, link: &Path, target: &Path) -> Result<()> {
        self.symlinks
            .borrow_mut()
            .push((link.to_path_buf(), target.to_path_buf()));
        self.existing.borrow_mut().insert(link.to_path_buf());
        Ok(())
    }

    fn rm_symlink(&self, link: &Path) -> Result<()> {
        self.removed_links.borrow_mut().push(link.to_path_buf());
        self.existing.borrow_mut().remove(link);
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(path.to_path_buf())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no fake file at {}", path.display()),
            ))
        })
    }

    fn which(&self, command: &str) -> Option<PathBuf> {
        if self.missing_commands.borrow().contains(command) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(command))
        }
    }
}

/// Recording fake for [`CodeHost`].
#[derive(Default)]
pub struct FakeHost {
    /// `(args, directory key)` per created pull request.
    pub created: RefCell<Vec<(Vec<String>, String)>>,
    /// `(url, body, directory key)` per comment.
    pub comments: RefCell<Vec<(String, String, String)>>,
    /// Whether `check_authenticated` reports success.
    pub authenticated: RefCell<bool>,
}

impl FakeHost {
    pub fn authenticated() -> Self {
        let host = Self::default();
        *host.authenticated.borrow_mut() = true;
        host
    }
}

impl CodeHost for FakeHost {
    fn create_pull_request(
        &self,
        extra_args: &[String],
        directory: Option<&Path>,
    ) -> Result<String> {
        let url = format!(
            "https://github.com/org/repo/pull/{}",
            self.created.borrow().len() + 1
        );
        self.created
            .borrow_mut()
            .push((extra_args.to_vec(), dir_key(directory)));
        Ok(url)
    }

    fn comment_on_pull_request(
        &self,
        pr_url: &str,
        comment: &str,
        directory: Option<&Path>,
    ) -> Result<()> {
        self.comments.borrow_mut().push((
            pr_url.to_string(),
            comment.to_string(),
            dir_key(directory),
        ));
        Ok(())
    }

    fn check_authenticated(&self) -> Result<bool> {
        Ok(*self.authenticated.borrow())
    }
}
