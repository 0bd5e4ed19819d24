//! # Fetch Orchestration
//!
//! [`FetchCommand`] fetches one package into a local directory. The steps run
//! strictly in order, each depending on the on-disk result of the previous
//! one:
//!
//! 1. **Validating**: every mandatory input is present and the package path
//!    stays inside the repository.
//! 2. **Destination check**: an existing destination is only touched when
//!    overwrite was requested.
//! 3. **Cloning**: the version control client materializes the ref in a
//!    scratch directory. From here on the scratch directory is removed on
//!    every exit path, because it is owned by the [`Materialized`] value.
//! 4. **Cleaning**: with overwrite, the old destination is removed.
//! 5. **Copying**: the package directory is copied out of the scratch clone.
//! 6. **Reconciling**: the destination `Pkgfile` is pointed at the commit that
//!    was fetched.
//!
//! Any failure stops the sequence and is returned as-is. Concurrent fetches
//! into the same destination are not coordinated here.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filesystem::copy_dir;
use crate::git::{Materialized, VersionControl};
use crate::pkgfile::{GitUpstream, Pkgfile};
use crate::reconcile::upsert_pkgfile;
use crate::reference::{escapes_repository, RepoReference};
use crate::suggestions::web_ui_hint;

/// A request to fetch a package into `destination`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchCommand {
    /// Remote repository (`org/name`, URL or local path).
    pub remote: String,
    /// Package path inside the repository; `/` for the repository root.
    pub subdirectory: String,
    /// Branch, tag or ref to fetch.
    pub revision: String,
    /// Directory the package is copied to.
    pub destination: PathBuf,
    /// Package name for a newly created `Pkgfile`. Defaults to the
    /// destination's base name.
    pub name: Option<String>,
    /// Replace an existing destination instead of failing.
    pub overwrite: bool,
}

/// What a successful fetch produced.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub destination: PathBuf,
    /// The ref that was fetched (possibly the package-prefixed tag).
    pub fetched_ref: String,
    /// Commit the package is pinned to.
    pub commit: String,
    /// The record as written to the destination.
    pub pkgfile: Pkgfile,
}

impl FetchCommand {
    /// Rejects a request with a missing mandatory field.
    pub fn validate(&self) -> Result<()> {
        if self.remote.trim().is_empty() {
            return Err(Error::Validation { field: "repo" });
        }
        if self.revision.trim().is_empty() {
            return Err(Error::Validation { field: "ref" });
        }
        if self.destination.as_os_str().is_empty() {
            return Err(Error::Validation {
                field: "destination",
            });
        }
        if self.subdirectory.is_empty() {
            return Err(Error::Validation {
                field: "remote subdirectory",
            });
        }
        if escapes_repository(&self.subdirectory) {
            return Err(Error::InvalidSubdirectory {
                subdirectory: self.subdirectory.clone(),
            });
        }
        Ok(())
    }

    /// Name recorded for a new package: the explicit name, else the
    /// destination's base name.
    pub fn package_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match self.destination.file_name() {
            Some(base) => base.to_string_lossy().into_owned(),
            None => RepoReference::new(&self.remote, &self.subdirectory, "").package_name(),
        }
    }

    /// Runs the fetch with `vcs`.
    pub fn run(&self, vcs: &dyn VersionControl) -> Result<FetchOutcome> {
        self.validate()?;
        let name = self.package_name();

        if self.destination.exists() && !self.overwrite {
            return Err(Error::DestinationExists {
                path: self.destination.clone(),
            });
        }

        let reference = RepoReference::new(&self.remote, &self.subdirectory, &self.revision);
        let materialized = vcs.materialize(&reference)?;
        info!(
            "fetched {} at {}",
            reference.display_location(),
            materialized.fetched_ref
        );

        if self.overwrite {
            remove_existing(&self.destination)?;
        }

        self.copy_package(&materialized)?;

        let commit = vcs.head_commit(&materialized)?;
        let directory = match materialized.reference.subdirectory.as_str() {
            "" => "/".to_string(),
            normalized => normalized.to_string(),
        };
        let upstream = GitUpstream {
            repo: self.remote.clone(),
            directory,
            r#ref: self.revision.clone(),
            commit: commit.clone(),
        };
        let pkgfile = upsert_pkgfile(&self.destination, &name, upstream)?;
        info!(
            "pinned {} to {}",
            self.destination.display(),
            commit
        );

        let fetched_ref = materialized.fetched_ref.clone();
        materialized.cleanup();

        Ok(FetchOutcome {
            destination: self.destination.clone(),
            fetched_ref,
            commit,
            pkgfile,
        })
    }

    fn copy_package(&self, materialized: &Materialized) -> Result<()> {
        let source = materialized.package_dir();
        if !source.is_dir() {
            let reference = &materialized.reference;
            return Err(Error::SubdirectoryNotFound {
                subdirectory: reference.subdirectory.clone(),
                remote: reference.remote.clone(),
                r#ref: reference.revision.clone(),
                hint: web_ui_hint(&reference.subdirectory),
            });
        }
        copy_dir(&source, &self.destination)
    }
}

fn remove_existing(destination: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(destination) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(destination, e)),
    };
    info!("removing existing {}", destination.display());
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(destination)
    } else {
        fs::remove_file(destination)
    };
    removed.map_err(|e| Error::io(destination, e))
}
