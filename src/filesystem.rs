//! # Directory Copy
//!
//! Copies a materialized package out of the scratch clone. Relative structure
//! and file contents are preserved, and permissions are carried over on a best
//! effort basis. Git metadata (`.git` directories or gitlink files left by
//! submodules) is never copied.

use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

fn is_git_metadata(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name() == ".git"
}

/// Recursively copies `src` into `dst`, creating `dst` if needed.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_git_metadata(entry))
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            Error::io(path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::io(entry.path(), std::io::Error::other(e)))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link = fs::read_link(src).map_err(|e| Error::io(src, e))?;
    std::os::unix::fs::symlink(&link, dst).map_err(|e| Error::io(dst, e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).map_err(|e| Error::io(src, e))?;
    Ok(())
}
