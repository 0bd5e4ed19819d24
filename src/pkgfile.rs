//! # Package Identity Record
//!
//! Every fetched package carries a `Pkgfile` at its root recording where it
//! came from:
//!
//! ```yaml
//! apiVersion: confpkg.dev/v1
//! kind: Pkgfile
//! metadata:
//!   name: redis
//! upstream:
//!   type: git
//!   git:
//!     repo: https://github.com/org/charts
//!     directory: charts/redis
//!     ref: v1.2.0
//!     commit: 4b825dc642cb6eb9a060e54bf8d69288fbee4904
//! ```
//!
//! Keys this module does not know about are kept in `extra` maps and written
//! back unchanged, so rewriting a record only ever touches the fields that
//! were explicitly changed.

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Mapping;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::defaults::{PKGFILE_API_VERSION, PKGFILE_KIND, PKGFILE_NAME, SUPPORTED_API_VERSIONS};
use crate::error::{Error, Result};

/// The identity record of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pkgfile {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// Provenance. A section this version cannot interpret (another origin
    /// type, say) loads as `None`; it is replaced on the next fetch anyway.
    #[serde(
        default,
        deserialize_with = "lenient_upstream",
        skip_serializing_if = "Option::is_none"
    )]
    pub upstream: Option<Upstream>,
    /// Top-level keys not modelled above.
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Record metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    /// Metadata keys not modelled above (labels, annotations, ...).
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Kind of origin a package was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    Git,
}

/// Provenance of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upstream {
    #[serde(rename = "type")]
    pub origin: OriginKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitUpstream>,
}

/// Git provenance: the requested location plus the commit it resolved to.
///
/// Missing fields load as empty strings, so a record that is still being
/// authored (no commit yet) is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitUpstream {
    /// Remote repository as requested.
    pub repo: String,
    /// Package path inside the repository.
    pub directory: String,
    /// Requested branch, tag or ref.
    pub r#ref: String,
    /// Immutable commit the ref resolved to.
    pub commit: String,
}

fn lenient_upstream<'de, D>(deserializer: D) -> std::result::Result<Option<Upstream>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_yaml::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_yaml::from_value(value) {
        Ok(upstream) => Ok(Some(upstream)),
        Err(e) => {
            debug!("ignoring unrecognized upstream section: {}", e);
            Ok(None)
        }
    }
}

impl Upstream {
    pub fn git(git: GitUpstream) -> Self {
        Self {
            origin: OriginKind::Git,
            git: Some(git),
        }
    }
}

impl Pkgfile {
    /// A minimal record for a package named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: PKGFILE_API_VERSION.to_string(),
            kind: PKGFILE_KIND.to_string(),
            metadata: Metadata {
                name: name.into(),
                extra: Mapping::new(),
            },
            upstream: None,
            extra: Mapping::new(),
        }
    }

    /// The git provenance, if the record has one.
    pub fn git_upstream(&self) -> Option<&GitUpstream> {
        self.upstream.as_ref().and_then(|upstream| upstream.git.as_ref())
    }
}

/// Path of the record inside `package_dir`.
pub fn pkgfile_path(package_dir: &Path) -> PathBuf {
    package_dir.join(PKGFILE_NAME)
}

#[derive(Deserialize)]
struct TypeMeta {
    #[serde(rename = "apiVersion", default)]
    api_version: Option<String>,
}

/// Reads the record in `package_dir`.
///
/// Returns `Ok(None)` when there is no record (or no directory). A record
/// with an unsupported `apiVersion` is `UnknownPkgfileVersion` located at the
/// file path; callers that know the remote location should rewrite it.
pub fn read_pkgfile(package_dir: &Path) -> Result<Option<Pkgfile>> {
    let path = pkgfile_path(package_dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if is_missing(&e) => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };

    let location = path.display().to_string();
    let type_meta: TypeMeta = serde_yaml::from_str(&content).map_err(|e| Error::Pkgfile {
        location: location.clone(),
        message: e.to_string(),
    })?;
    let version = type_meta.api_version.unwrap_or_default();
    if !SUPPORTED_API_VERSIONS.contains(&version.as_str()) {
        return Err(Error::UnknownPkgfileVersion { version, location });
    }

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| Error::Pkgfile {
            location,
            message: e.to_string(),
        })
}

/// Writes `pkgfile` into `package_dir`, replacing any existing record.
pub fn write_pkgfile(package_dir: &Path, pkgfile: &Pkgfile) -> Result<()> {
    let path = pkgfile_path(package_dir);
    let content = serde_yaml::to_string(pkgfile)?;
    fs::write(&path, content).map_err(|e| Error::io(path, e))
}

fn is_missing(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
