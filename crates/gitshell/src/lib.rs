//! Keeps a local working copy of a remote git repository in step with its
//! remote by driving the `git` command line and parsing its output.
//!
//! ```ignore
//! use gitshell::{RepoOptions, Repository};
//!
//! let repo = Repository::open(
//!     "https://github.com/acme/widgets.git",
//!     "main",
//!     "/srv/checkouts",
//!     RepoOptions::default(),
//! )?;
//! let head = repo.current_commit_id()?;
//! for change in repo.diff_status("HEAD~1", &head)? {
//!     println!("{:?} {}", change.change_kind, change.path);
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod parse;
pub mod repository;
pub mod runner;
pub mod types;

pub use config::{load_config, load_config_from_str, RepoConfig};
pub use error::{CommandError, ConfigError, RepoError, Result};
pub use repository::Repository;
pub use runner::{CommandOutput, CommandRunner, SystemGit};
pub use types::{ChangeKind, ChangeRecord, RepoOptions};
