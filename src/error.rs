//! # Error Handling
//!
//! This module defines the centralized error type for `confpkg`. Every step of
//! a fetch returns its failure to the caller as one of these variants rather
//! than terminating the process, so the orchestrator (and ultimately the CLI)
//! decides how to report it.
//!
//! Variants carry the *external* location of the package (remote, ref,
//! subdirectory) rather than the scratch clone path, so that a human can fix
//! the command that produced the error without digging through temporary
//! directories.
//!
//! - **`Validation`**: a mandatory input was missing.
//! - **`DestinationExists`**: the destination exists and overwrite was not
//!   requested.
//! - **`GitNotFound`**: the git executable could not be started.
//! - **`RevisionControl`**: a git subprocess failed while materializing a ref.
//! - **`InvalidSubdirectory`**: the package path climbs out of the
//!   repository with `..`.
//! - **`SubdirectoryNotFound`**: the ref was fetched but the package path
//!   does not exist in it.
//! - **`UnknownPkgfileVersion`**: a `Pkgfile` declares an unsupported
//!   `apiVersion`.
//! - **`Io`**: filesystem failures, with the path that triggered them.

use std::path::PathBuf;
use thiserror::Error;

fn render_hint(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

/// Main error type for confpkg operations
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory input was not provided.
    #[error("Invalid fetch request: must specify {field}")]
    Validation { field: &'static str },

    /// The destination directory already exists and overwrite was not requested.
    #[error("Destination directory {} already exists\n  hint: pass --overwrite to replace it", path.display())]
    DestinationExists { path: PathBuf },

    /// The git executable could not be located or started.
    #[error("Unable to run '{program}': {message}\n  hint: install git or set CONFPKG_GIT to its location")]
    GitNotFound { program: String, message: String },

    /// A git subprocess failed while materializing a ref.
    ///
    /// `refs` lists every ref that was attempted, in order.
    #[error("Git {operation} failed for {remote}@{}: {message}{}", refs.join(", "), render_hint(hint))]
    RevisionControl {
        remote: String,
        refs: Vec<String>,
        operation: String,
        message: String,
        /// Optional hint for how to resolve the failure
        hint: Option<String>,
    },

    /// The package path points outside the repository.
    #[error("Package path \"{subdirectory}\" must stay inside the repository\n  hint: remove the '..' segments")]
    InvalidSubdirectory { subdirectory: String },

    /// The ref exists but does not contain the requested package directory.
    #[error("Missing subdirectory \"{subdirectory}\" in repo \"{remote}\" at ref \"{r#ref}\"{}", render_hint(hint))]
    SubdirectoryNotFound {
        subdirectory: String,
        remote: String,
        r#ref: String,
        hint: Option<String>,
    },

    /// A `Pkgfile` declares an `apiVersion` this version of confpkg cannot read.
    ///
    /// `location` is the human-facing location of the record: the package in
    /// the remote repository when known, otherwise the file path.
    #[error("Unknown Pkgfile apiVersion {version:?} in {location}\n  hint: upgrade confpkg or fetch an older ref of the package")]
    UnknownPkgfileVersion { version: String, location: String },

    /// A `Pkgfile` exists but could not be parsed.
    #[error("Invalid Pkgfile in {location}: {message}")]
    Pkgfile { location: String, message: String },

    /// `git rev-parse` did not produce a commit identifier.
    #[error("Could not resolve HEAD of {remote} to a commit, got {output:?}")]
    UnresolvedCommit { remote: String, output: String },

    /// An I/O error tied to a specific path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A YAML serialization error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Wraps an `io::Error` with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let error = Error::Validation {
            field: "destination",
        };
        let display = format!("{}", error);
        assert!(display.contains("must specify destination"));
    }

    #[test]
    fn test_error_display_invalid_subdirectory() {
        let error = Error::InvalidSubdirectory {
            subdirectory: "../secret".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("\"../secret\""));
        assert!(display.contains("inside the repository"));
    }

    #[test]
    fn test_error_display_destination_exists() {
        let error = Error::DestinationExists {
            path: PathBuf::from("/work/pkg"),
        };
        let display = format!("{}", error);
        assert!(display.contains("/work/pkg"));
        assert!(display.contains("already exists"));
        assert!(display.contains("--overwrite"));
    }

    #[test]
    fn test_error_display_revision_control() {
        let error = Error::RevisionControl {
            remote: "https://github.com/test/repo".to_string(),
            refs: vec!["pkg/v1".to_string(), "v1".to_string()],
            operation: "fetch".to_string(),
            message: "couldn't find remote ref v1".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Git fetch failed"));
        assert!(display.contains("https://github.com/test/repo@pkg/v1, v1"));
        assert!(display.contains("couldn't find remote ref"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_revision_control_with_hint() {
        let error = Error::RevisionControl {
            remote: "https://github.com/test/repo".to_string(),
            refs: vec!["main".to_string()],
            operation: "fetch".to_string(),
            message: "Authentication failed".to_string(),
            hint: Some("Check SSH keys".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("hint:"));
        assert!(display.contains("Check SSH keys"));
    }

    #[test]
    fn test_error_display_subdirectory_not_found() {
        let error = Error::SubdirectoryNotFound {
            subdirectory: "missing/pkg".to_string(),
            remote: "org/repo".to_string(),
            r#ref: "v2".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("\"missing/pkg\""));
        assert!(display.contains("\"org/repo\""));
        assert!(display.contains("\"v2\""));
    }

    #[test]
    fn test_error_display_unknown_pkgfile_version() {
        let error = Error::UnknownPkgfileVersion {
            version: "confpkg.dev/v9".to_string(),
            location: "org/repo/pkg@v1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("confpkg.dev/v9"));
        assert!(display.contains("org/repo/pkg@v1"));
    }

    #[test]
    fn test_error_io_keeps_path_and_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Error::io("/tmp/dest", io_error);
        let display = format!("{}", error);
        assert!(display.contains("/tmp/dest"));
        assert!(display.contains("denied"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML error"));
    }
}
