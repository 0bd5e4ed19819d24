//! Default values for confpkg.
//!
//! This module provides centralized default values used across the library
//! and the CLI, ensuring consistency and avoiding duplication.

/// File name of the package identity record inside every package directory.
pub const PKGFILE_NAME: &str = "Pkgfile";

/// `apiVersion` written to new identity records.
pub const PKGFILE_API_VERSION: &str = "confpkg.dev/v1";

/// `kind` written to new identity records.
pub const PKGFILE_KIND: &str = "Pkgfile";

/// Every `apiVersion` this build knows how to read.
pub const SUPPORTED_API_VERSIONS: &[&str] = &[PKGFILE_API_VERSION];

/// Prefix for the scratch directories that hold ephemeral clones.
pub const SCRATCH_PREFIX: &str = "confpkg-get-";

/// Git program used when `CONFPKG_GIT` is not set.
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// Branch assumed when the remote does not advertise a symbolic `HEAD`.
pub const FALLBACK_DEFAULT_BRANCH: &str = "master";
