//! Error types for working-copy operations.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A git invocation that exited non-zero or could not be started.
#[derive(Error, Debug)]
pub struct CommandError {
    /// Short name of the repository the command ran against.
    pub repo: String,
    /// Full argument vector passed to git.
    pub args: Vec<String>,
    /// Combined stdout and stderr of the process.
    pub output: String,
    /// Launch failure, when the process never ran.
    #[source]
    pub source: Option<std::io::Error>,
}

impl CommandError {
    pub(crate) fn new(repo: &str, args: &[&str], output: String) -> Self {
        Self {
            repo: repo.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            output,
            source: None,
        }
    }

    pub(crate) fn launch(repo: &str, args: &[&str], source: std::io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(repo, args, String::new())
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to run command 'git {}' on repo {}",
            self.args.join(" "),
            self.repo
        )?;
        let output = self.output.trim();
        if !output.is_empty() {
            write!(f, ": {}", output)?;
        } else if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

/// Errors that can occur while managing a working copy.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Invalid repository URL '{0}'")]
    InvalidUrl(String),

    #[error("Parent directory does not exist: {0}")]
    MissingParentDirectory(PathBuf),

    #[error("Failed to stat parent directory '{path}': {source}")]
    StatFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clone {url}: {source}")]
    CloneFailed {
        url: String,
        #[source]
        source: CommandError,
    },

    #[error("Failed to pull: {0}")]
    PullFailed(#[source] CommandError),

    #[error("Failed to check out '{branch}': {source}")]
    CheckoutFailed {
        branch: String,
        #[source]
        source: CommandError,
    },

    #[error(transparent)]
    CommandFailed(#[from] CommandError),

    #[error("Unexpected output from 'git {command}': {output}")]
    UnrecognizedOutput { command: String, output: String },

    #[error("Failed to add '{pattern}': {source}")]
    AddFailed {
        pattern: String,
        #[source]
        source: CommandError,
    },

    #[error("Failed to commit: {0}")]
    CommitFailed(#[source] CommandError),

    #[error("Failed to push: {0}")]
    PushFailed(#[source] CommandError),

    #[error("Failed to reconcile working copy: {0}")]
    ReconciliationFailed(#[source] Box<RepoError>),

    #[error("Failed to read working copy state: {0}")]
    IntrospectionFailed(#[source] Box<RepoError>),

    #[error("History of '{path}' has {found} commit(s), need 2 to find the pre-deletion revision")]
    HistoryTooShort { path: String, found: usize },
}

impl RepoError {
    /// Returns the combined output of the innermost failed git command, if any.
    pub fn command_output(&self) -> Option<&str> {
        match self {
            RepoError::CloneFailed { source, .. }
            | RepoError::CheckoutFailed { source, .. }
            | RepoError::AddFailed { source, .. } => Some(&source.output),
            RepoError::PullFailed(source)
            | RepoError::CommandFailed(source)
            | RepoError::CommitFailed(source)
            | RepoError::PushFailed(source) => Some(&source.output),
            RepoError::ReconciliationFailed(inner) | RepoError::IntrospectionFailed(inner) => {
                inner.command_output()
            }
            RepoError::UnrecognizedOutput { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Errors that can occur while loading a repository config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// Result type for working-copy operations.
pub type Result<T> = std::result::Result<T, RepoError>;
