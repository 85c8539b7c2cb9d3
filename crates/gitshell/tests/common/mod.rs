//! Shared test utilities for gitshell integration tests.
//!
//! This module provides:
//! - `FakeGit`, a scripted `CommandRunner` that records every invocation
//! - helpers for driving a real `git` binary in end-to-end tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;

use gitshell::{CommandOutput, CommandRunner};

/// One recorded git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub dir: PathBuf,
    pub args: Vec<String>,
}

enum Reply {
    Output(CommandOutput),
    LaunchError,
}

/// Scripted command runner.
///
/// Replies are matched by argument prefix, most recently scripted first.
/// Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct FakeGit {
    rules: RefCell<Vec<(Vec<String>, Reply)>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies successfully with `output` to commands starting with `prefix`.
    pub fn ok(self, prefix: &[&str], output: &str) -> Self {
        self.push(prefix, Reply::Output(CommandOutput::ok(output)))
    }

    /// Fails commands starting with `prefix` with exit code 1 and `output`.
    pub fn fail(self, prefix: &[&str], output: &str) -> Self {
        self.push(prefix, Reply::Output(CommandOutput::failed(1, output)))
    }

    /// Makes commands starting with `prefix` fail to launch.
    pub fn unlaunchable(self, prefix: &[&str]) -> Self {
        self.push(prefix, Reply::LaunchError)
    }

    fn push(self, prefix: &[&str], reply: Reply) -> Self {
        let prefix = prefix.iter().map(|s| s.to_string()).collect();
        self.rules.borrow_mut().push((prefix, reply));
        self
    }

    /// All recorded invocations, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Recorded argument vectors joined with spaces.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.args.join(" "))
            .collect()
    }

    /// Whether any recorded command starts with `first`.
    pub fn ran(&self, first: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| c.args.first().map(String::as_str) == Some(first))
    }
}

impl CommandRunner for FakeGit {
    fn run(&self, dir: &Path, args: &[&str]) -> std::io::Result<CommandOutput> {
        self.calls.borrow_mut().push(Call {
            dir: dir.to_path_buf(),
            args: args.iter().map(|s| s.to_string()).collect(),
        });

        let rules = self.rules.borrow();
        let reply = rules
            .iter()
            .rev()
            .find(|(prefix, _)| {
                prefix.len() <= args.len() && prefix.iter().zip(args).all(|(p, a)| p == a)
            })
            .map(|(_, reply)| reply);

        match reply {
            Some(Reply::Output(out)) => Ok(out.clone()),
            Some(Reply::LaunchError) => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "git: not found",
            )),
            None => Ok(CommandOutput::ok("")),
        }
    }
}

/// Returns true when a `git` binary can be launched.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Runs git in `dir` and panics on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to launch git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Sets a commit identity on the repository in `dir`.
pub fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
}
