//! Process execution for git commands.
//!
//! All git invocations go through a [`CommandRunner`], so the repository
//! logic can be driven by a scripted fake in tests.

use std::io::Read;
use std::path::Path;
use std::process::Command;

/// Result of one external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Stdout and stderr interleaved in the order the tool wrote them.
    pub output: String,
}

impl CommandOutput {
    /// Successful output with the given text.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            output: output.into(),
        }
    }

    /// Failed output with the given exit code and text.
    pub fn failed(code: i32, output: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            output: output.into(),
        }
    }
}

/// Executes git with an argument vector inside a directory.
///
/// An `Err` means the process could not be launched at all; a non-zero exit
/// is reported through [`CommandOutput::success`].
pub trait CommandRunner {
    fn run(&self, dir: &Path, args: &[&str]) -> std::io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, dir: &Path, args: &[&str]) -> std::io::Result<CommandOutput> {
        (**self).run(dir, args)
    }
}

/// Runs the system `git` binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    binary: String,
}

impl SystemGit {
    /// Uses the given executable instead of `git` from `PATH`.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Returns the executable this runner invokes.
    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::with_binary("git")
    }
}

impl CommandRunner for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> std::io::Result<CommandOutput> {
        tracing::debug!(dir = %dir.display(), args = ?args, "running {}", self.binary);

        // Both streams share one pipe so the combined text keeps git's ordering.
        let (mut reader, writer) = std::io::pipe()?;
        let mut child = Command::new(&self.binary)
            .current_dir(dir)
            .args(args)
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .spawn()
            .inspect_err(|e| {
                tracing::warn!(binary = %self.binary, error = %e, "failed to launch");
            })?;

        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let status = child.wait()?;

        Ok(CommandOutput {
            success: status.success(),
            code: status.code(),
            output: String::from_utf8_lossy(&raw).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binary_is_git() {
        assert_eq!(SystemGit::default().binary(), "git");
    }

    #[test]
    fn test_launch_failure_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = SystemGit::with_binary("gitshell-definitely-not-a-binary");
        assert!(runner.run(dir.path(), &["status"]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_combines_stdout_and_stderr() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = SystemGit::with_binary("sh");
        let out = runner
            .run(dir.path(), &["-c", "echo out; echo err 1>&2; exit 3"])
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.output, "out\nerr\n");
    }
}
