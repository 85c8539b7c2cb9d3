//! File-based configuration for a managed working copy.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::parse::short_name_from_url;
use crate::repository::Repository;
use crate::runner::SystemGit;
use crate::types::RepoOptions;

/// Everything needed to open one working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    /// Remote repository URL.
    pub url: String,

    /// Branch to keep checked out.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Directory the working copy is cloned under.
    pub parent_directory: PathBuf,

    /// Git executable to invoke.
    #[serde(default = "default_git_binary")]
    pub git_binary: String,

    #[serde(flatten)]
    pub options: RepoOptions,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

impl RepoConfig {
    /// Opens (cloning or pulling as needed) the configured working copy.
    pub fn open(&self) -> Result<Repository<SystemGit>> {
        Repository::open_with_runner(
            SystemGit::with_binary(&self.git_binary),
            &self.url,
            &self.branch,
            &self.parent_directory,
            self.options.clone(),
        )
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> std::result::Result<RepoConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> std::result::Result<RepoConfig, ConfigError> {
    let config: RepoConfig = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &RepoConfig) -> std::result::Result<(), ConfigError> {
    if short_name_from_url(&config.url).is_none() {
        return Err(ConfigError::Validation {
            message: format!("Invalid repository url: '{}'", config.url),
        });
    }

    if config.branch.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "Branch must not be empty".to_string(),
        });
    }

    if config.parent_directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "Parent directory must not be empty".to_string(),
        });
    }

    if config.git_binary.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "Git binary must not be empty".to_string(),
        });
    }

    if let Some(dir) = &config.options.clone_dir {
        let mut components = Path::new(dir).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal {
            return Err(ConfigError::Validation {
                message: format!("Clone directory must be a single directory name: '{}'", dir),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = load_config_from_str(
            r#"{"url": "https://github.com/acme/widgets.git", "parentDirectory": "/srv"}"#,
        )
        .unwrap();

        assert_eq!(config.branch, "main");
        assert_eq!(config.git_binary, "git");
        assert_eq!(config.parent_directory, PathBuf::from("/srv"));
        assert_eq!(config.options, RepoOptions::default());
    }

    #[test]
    fn test_full_config() {
        let config = load_config_from_str(
            r#"{
                "url": "git@github.com:acme/widgets.git",
                "branch": "release",
                "parentDirectory": "/srv",
                "gitBinary": "/usr/local/bin/git",
                "rebaseOnPull": true,
                "cloneDir": "widgets-release"
            }"#,
        )
        .unwrap();

        assert_eq!(config.branch, "release");
        assert_eq!(config.git_binary, "/usr/local/bin/git");
        assert!(config.options.rebase_on_pull);
        assert_eq!(config.options.clone_dir.as_deref(), Some("widgets-release"));
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = load_config_from_str(r#"{"url": "https://example.com/", "parentDirectory": "/srv"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_rejects_empty_branch() {
        let err = load_config_from_str(
            r#"{"url": "https://example.com/a.git", "branch": " ", "parentDirectory": "/srv"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Branch"));
    }

    #[test]
    fn test_rejects_nested_clone_dir() {
        for dir in ["a/b", "..", "/abs"] {
            let json = format!(
                r#"{{"url": "https://example.com/a.git", "parentDirectory": "/srv", "cloneDir": "{}"}}"#,
                dir
            );
            let err = load_config_from_str(&json).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { .. }), "accepted {}", dir);
        }
    }

    #[test]
    fn test_missing_url_is_parse_error() {
        let err = load_config_from_str(r#"{"parentDirectory": "/srv"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson(_)));
    }
}
