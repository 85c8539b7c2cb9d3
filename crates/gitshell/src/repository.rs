//! Working-copy operations.

use std::path::{Path, PathBuf};

use crate::error::{CommandError, RepoError, Result};
use crate::parse::{
    is_clean_status, log_commit_ids, parse_current_branch, parse_diff_status,
    short_name_from_url, trim_commit_id,
};
use crate::runner::{CommandRunner, SystemGit};
use crate::types::{ChangeRecord, RepoOptions};

/// Directory whose presence marks a local directory as a checkout.
const METADATA_DIR: &str = ".git";

/// A working copy of one remote repository.
///
/// Every operation blocks on a single git process. Callers must not run
/// operations concurrently against the same local directory.
pub struct Repository<R: CommandRunner = SystemGit> {
    url: String,
    name: String,
    parent_dir: PathBuf,
    local_dir: PathBuf,
    options: RepoOptions,
    runner: R,
}

impl Repository<SystemGit> {
    /// Opens the working copy of `url` under `parent_dir` using the system
    /// git, cloning or pulling it and checking out `branch` as needed.
    pub fn open(
        url: &str,
        branch: &str,
        parent_dir: impl Into<PathBuf>,
        options: RepoOptions,
    ) -> Result<Self> {
        Self::open_with_runner(SystemGit::default(), url, branch, parent_dir, options)
    }
}

impl<R: CommandRunner> Repository<R> {
    /// Builds a handle without touching the filesystem or running git.
    pub fn new(
        runner: R,
        url: &str,
        parent_dir: impl Into<PathBuf>,
        options: RepoOptions,
    ) -> Result<Self> {
        let name = short_name_from_url(url)
            .ok_or_else(|| RepoError::InvalidUrl(url.to_string()))?
            .to_string();
        let parent_dir = parent_dir.into();
        let local_dir = match options.clone_dir.as_deref() {
            Some(dir) if !dir.is_empty() => parent_dir.join(dir),
            _ => parent_dir.join(&name),
        };

        Ok(Self {
            url: url.to_string(),
            name,
            parent_dir,
            local_dir,
            options,
            runner,
        })
    }

    /// Like [`Repository::open`], with a caller-supplied command runner.
    pub fn open_with_runner(
        runner: R,
        url: &str,
        branch: &str,
        parent_dir: impl Into<PathBuf>,
        options: RepoOptions,
    ) -> Result<Self> {
        let repo = Self::new(runner, url, parent_dir, options)?;

        repo.clone_or_pull()
            .map_err(|e| RepoError::ReconciliationFailed(Box::new(e)))?;

        let current = repo
            .current_branch()
            .map_err(|e| RepoError::IntrospectionFailed(Box::new(e)))?;
        if current != branch {
            repo.checkout(branch)?;
        }

        Ok(repo)
    }

    /// Returns the remote URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the short name derived from the URL.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the directory the working copy lives under.
    pub fn parent_dir(&self) -> &Path {
        &self.parent_dir
    }

    /// Returns the working copy directory.
    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Returns the options this handle was built with.
    pub fn options(&self) -> &RepoOptions {
        &self.options
    }

    /// Returns the command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Checks if the local directory holds git metadata.
    pub fn is_checkout(&self) -> bool {
        self.local_dir.join(METADATA_DIR).exists()
    }

    /// Clones when there is no checkout yet, pulls with rebase when the
    /// checkout is not clean, and otherwise does nothing.
    ///
    /// A clean checkout is assumed current; no further comparison against
    /// the remote happens.
    pub fn clone_or_pull(&self) -> Result<()> {
        if !self.is_checkout() {
            return self.clone_repo();
        }
        if !self.is_clean() {
            return self.pull(true);
        }
        log::debug!("{}: working copy is clean, skipping pull", self.name);
        Ok(())
    }

    /// Clones the remote into the local directory, then pins the `origin`
    /// URL to the configured one.
    pub fn clone_repo(&self) -> Result<()> {
        log::debug!("{}: cloning {} into {:?}", self.name, self.url, self.local_dir);

        match std::fs::metadata(&self.parent_dir) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepoError::MissingParentDirectory(self.parent_dir.clone()));
            }
            Err(source) => {
                return Err(RepoError::StatFailure {
                    path: self.parent_dir.clone(),
                    source,
                });
            }
        }

        // git runs inside the parent directory, so the target is relative to it.
        let target = self
            .local_dir
            .strip_prefix(&self.parent_dir)
            .unwrap_or(self.local_dir.as_path())
            .to_string_lossy();
        let args = ["clone", self.url.as_str(), &*target];
        self.exec_in(&self.parent_dir, &args)
            .map_err(|source| RepoError::CloneFailed {
                url: self.url.clone(),
                source,
            })?;

        self.run_git(&["remote", "set-url", "origin", &self.url])?;
        Ok(())
    }

    /// Pulls from the upstream branch, optionally rebasing local commits.
    pub fn pull(&self, rebase: bool) -> Result<()> {
        log::debug!("{}: pulling (rebase: {})", self.name, rebase);

        let mut args = vec!["pull"];
        if rebase {
            args.push("--rebase");
        }
        self.exec(&args).map_err(RepoError::PullFailed)?;
        Ok(())
    }

    /// Pulls using the handle's configured rebase option.
    pub fn pull_default(&self) -> Result<()> {
        self.pull(self.options.rebase_on_pull)
    }

    /// Checks out a branch or ref.
    pub fn checkout(&self, branch: &str) -> Result<()> {
        log::debug!("{}: checking out {}", self.name, branch);

        self.exec(&["checkout", branch])
            .map_err(|source| RepoError::CheckoutFailed {
                branch: branch.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Fetches, then reports whether status shows the branch level with its
    /// upstream and nothing to commit.
    ///
    /// Any failure counts as not clean, so callers cannot tell a dirty copy
    /// from one that could not be checked. The check matches git's English
    /// status text and is unreliable under other locales.
    pub fn is_clean(&self) -> bool {
        if let Err(e) = self.run_git(&["fetch"]) {
            log::warn!("{}: fetch failed, treating as not clean: {}", self.name, e);
            return false;
        }
        match self.run_git(&["status"]) {
            Ok(out) => is_clean_status(&out),
            Err(e) => {
                log::warn!("{}: status failed, treating as not clean: {}", self.name, e);
                false
            }
        }
    }

    /// Gets the current branch name from `git branch`.
    pub fn current_branch(&self) -> Result<String> {
        let out = self.run_git(&["branch"])?;
        match parse_current_branch(&out) {
            Some(branch) => Ok(branch.to_string()),
            None => Err(RepoError::UnrecognizedOutput {
                command: "branch".to_string(),
                output: out,
            }),
        }
    }

    /// Gets the commit id of `HEAD`.
    pub fn current_commit_id(&self) -> Result<String> {
        let out = self.run_git(&["rev-parse", "HEAD"])?;
        Ok(trim_commit_id(&out).to_string())
    }

    /// Gets the author email of one commit, as git prints it.
    ///
    /// The format argument is passed literally, so the result keeps the
    /// surrounding single quotes and the trailing newline.
    pub fn commit_author(&self, commit: &str) -> Result<String> {
        let range = format!("{}^!", commit);
        self.run_git(&["log", "--format='%ae'", &range])
    }

    /// Lists added, modified and deleted paths between two revisions.
    pub fn diff_status(&self, from: &str, to: &str) -> Result<Vec<ChangeRecord>> {
        let out = self.run_git(&["diff", "--name-status", from, to])?;
        Ok(parse_diff_status(&out))
    }

    /// Fetches the last version of a file from just before it was deleted.
    ///
    /// Assumes the deletion is the newest commit touching `path`; a file that
    /// was deleted and later recreated resolves to the wrong revision.
    pub fn show_deleted_file(&self, path: &str) -> Result<String> {
        let out = self.run_git(&["log", "--full-history", "-2", "--", path])?;
        let commits = log_commit_ids(&out);
        log::debug!("{}: history of {}: {:?}", self.name, path, commits);

        match commits.get(1) {
            Some(commit) => self.show_for_commit(commit, path),
            None => Err(RepoError::HistoryTooShort {
                path: path.to_string(),
                found: commits.len(),
            }),
        }
    }

    /// Gets the content of `path` at `commit`.
    pub fn show_for_commit(&self, commit: &str, path: &str) -> Result<String> {
        let spec = format!("{}:{}", commit, path);
        self.run_git(&["show", &spec])
    }

    /// Stages paths matching `pattern`.
    pub fn add(&self, pattern: &str) -> Result<()> {
        self.exec(&["add", pattern])
            .map_err(|source| RepoError::AddFailed {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Commits staged changes.
    pub fn commit(&self, message: &str) -> Result<()> {
        self.exec(&["commit", "-m", message])
            .map_err(RepoError::CommitFailed)?;
        Ok(())
    }

    /// Pushes the current branch.
    pub fn push(&self) -> Result<()> {
        log::debug!("{}: pushing", self.name);
        self.exec(&["push"]).map_err(RepoError::PushFailed)?;
        Ok(())
    }

    /// Stages everything, commits and pushes, stopping at the first failure.
    pub fn add_commit_push(&self, message: &str) -> Result<()> {
        self.add(".")?;
        self.commit(message)?;
        self.push()
    }

    /// Runs git in the working copy and returns its combined output.
    pub fn run_git(&self, args: &[&str]) -> Result<String> {
        Ok(self.exec(args)?)
    }

    fn exec(&self, args: &[&str]) -> std::result::Result<String, CommandError> {
        self.exec_in(&self.local_dir, args)
    }

    fn exec_in(&self, dir: &Path, args: &[&str]) -> std::result::Result<String, CommandError> {
        match self.runner.run(dir, args) {
            Ok(out) if out.success => Ok(out.output),
            Ok(out) => Err(CommandError::new(&self.name, args, out.output)),
            Err(e) => Err(CommandError::launch(&self.name, args, e)),
        }
    }
}

impl<R: CommandRunner> std::fmt::Debug for Repository<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("url", &self.url)
            .field("name", &self.name)
            .field("local_dir", &self.local_dir)
            .finish()
    }
}
