//! Shared test utilities for integration and E2E tests.
//!
//! The fixtures here build real git repositories on the local filesystem so
//! that fetches exercise the actual `git` executable without touching the
//! network. Remotes are addressed with `file://` URLs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if skip_without_git() {
//!         return;
//!     }
//!     let upstream = UpstreamRepo::new();
//!     upstream.write("pkg/config.yaml", "a: 1\n");
//!     upstream.commit("initial");
//!     upstream.tag("pkg/v1");
//! }
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    pub use super::skip_without_git;
    pub use super::UpstreamRepo;
}

/// Whether a test that needs `git` should be skipped.
///
/// Prints a note when skipping so the reason shows up with `--nocapture`.
pub fn skip_without_git() -> bool {
    if git_available() {
        return false;
    }
    eprintln!("Skipping: git executable not found");
    true
}

/// Check whether a usable `git` is on the PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

/// A git repository acting as the remote for a fetch.
///
/// The working tree lives in a directory named `upstream.git` so that package
/// arguments of the form `file:///.../upstream.git/<path>@<ref>` split at the
/// `.git` marker.
pub struct UpstreamRepo {
    temp_dir: assert_fs::TempDir,
}

impl UpstreamRepo {
    /// Create an empty repository whose default branch is `main`.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir(temp_dir.path().join("upstream.git"))
            .expect("Failed to create upstream directory");

        let repo = Self { temp_dir };
        repo.git(&["init", "--quiet"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo
    }

    /// Path of the repository working tree.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("upstream.git")
    }

    /// `file://` URL of the repository.
    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }

    /// Write a file relative to the working tree, creating parent directories.
    pub fn write(&self, path: &str, content: &str) -> &Self {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(full, content).expect("Failed to write file");
        self
    }

    /// Remove a file from the working tree.
    #[allow(dead_code)]
    pub fn remove(&self, path: &str) -> &Self {
        std::fs::remove_file(self.path().join(path)).expect("Failed to remove file");
        self
    }

    /// Stage everything and commit, returning the new commit id.
    pub fn commit(&self, message: &str) -> String {
        self.git(&["add", "--all"]);
        self.git(&["commit", "--quiet", "--message", message]);
        self.head()
    }

    /// Create a lightweight tag at HEAD.
    pub fn tag(&self, name: &str) -> &Self {
        self.git(&["tag", name]);
        self
    }

    /// Full commit id of HEAD.
    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    /// Run git in the working tree with a fixed identity, panicking on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=confpkg tests",
                "-c",
                "user.email=tests@confpkg.invalid",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

impl Default for UpstreamRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of the entries directly under `dir`, sorted.
#[allow(dead_code)]
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
