//! # Identity Record Reconciliation
//!
//! After a package has been copied to its destination, its `Pkgfile` is
//! updated with where it came from. An existing record is loaded and only its
//! `upstream` section is replaced; everything else in it is preserved. When
//! there is no record, a minimal one is created.
//!
//! The copy and this rewrite are not atomic: a crash between the two leaves a
//! package without (or with stale) provenance. Re-running the fetch with
//! overwrite repairs it.

use log::debug;
use std::path::Path;

use crate::error::Result;
use crate::pkgfile::{read_pkgfile, write_pkgfile, GitUpstream, Pkgfile, Upstream};

/// Writes `upstream` into the record at `destination`, creating a record
/// named `name` when none exists (or naming an unnamed one). Returns the
/// record as persisted.
pub fn upsert_pkgfile(destination: &Path, name: &str, upstream: GitUpstream) -> Result<Pkgfile> {
    let mut pkgfile = match read_pkgfile(destination)? {
        Some(existing) => existing,
        None => {
            debug!(
                "no Pkgfile in {}, creating one named {}",
                destination.display(),
                name
            );
            Pkgfile::new(name)
        }
    };

    if pkgfile.metadata.name.is_empty() {
        pkgfile.metadata.name = name.to_string();
    }
    pkgfile.upstream = Some(Upstream::git(upstream));
    write_pkgfile(destination, &pkgfile)?;
    Ok(pkgfile)
}
