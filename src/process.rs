//! # Process Execution
//!
//! The git client never spawns processes directly. It goes through a
//! [`ProcessRunner`], which owns the ambient process state (executable
//! lookup on `PATH`, environment, working directory) so that tests can swap in
//! a scripted runner instead of invoking a real `git`.
//!
//! [`SystemRunner`] is the real implementation built on
//! `std::process::Command`.

use std::io;
use std::path::Path;
use std::process::Command;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// A successful result with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed result with the given stderr.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stderr if the process wrote any, otherwise stdout. Git reports some
    /// failures on stdout.
    pub fn diagnostics(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Trait for running external programs - allows mocking in tests
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` with `args`, in `cwd` when given, and waits for it.
    ///
    /// An `Err` means the process could not be started at all (for example
    /// the program is not on `PATH`); a process that ran and failed is an
    /// `Ok` with `success == false`.
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> io::Result<ProcessOutput>;
}

/// Runs programs with `std::process::Command`, inheriting the current
/// environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> io::Result<ProcessOutput> {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        // Credentials must come from helpers or agents, never an interactive prompt.
        command.env("GIT_TERMINAL_PROMPT", "0");

        let output = command.output()?;
        Ok(ProcessOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
