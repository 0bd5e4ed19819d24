//! Scratch directories for ephemeral clones.
//!
//! Every materialization gets its own uniquely named directory under the
//! system temp dir. The directory is removed when the [`ScratchDir`] is
//! dropped, on success and on every error path alike. Removal failures are
//! logged and never replace the error that caused the unwind.

use log::{debug, warn};
use std::path::Path;
use tempfile::TempDir;

use crate::defaults::SCRATCH_PREFIX;
use crate::error::{Error, Result};

/// An owned, self-deleting scratch directory.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
}

impl ScratchDir {
    /// Allocates a fresh directory in the system temp dir.
    pub fn new() -> Result<Self> {
        Self::new_in(std::env::temp_dir())
    }

    /// Allocates a fresh directory under `parent`.
    pub fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| Error::io(parent, e))?;
        debug!("allocated scratch directory {}", dir.path().display());
        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Removes the directory now. Failures are logged, not returned.
    pub fn cleanup(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!("removed scratch directory {}", path.display()),
                Err(e) => warn!(
                    "failed to remove scratch directory {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        self.remove();
    }
}
