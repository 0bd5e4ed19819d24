//! # Package References
//!
//! A [`RepoReference`] names a package: a remote repository, a directory
//! inside it, and the revision to fetch. It is a plain value; the scratch
//! clone produced from it is returned separately by the git client as a
//! [`crate::git::Materialized`].
//!
//! [`PackageUri`] parses the compact command-line form
//! `REPO_URI[.git]/PKG_PATH[@REF]`.

use std::path::Path;

/// Where a package lives in a remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReference {
    /// Remote repository, as given by the user (`org/name`, URL or local path).
    pub remote: String,
    /// Slash-separated path of the package inside the repository. Empty means
    /// the repository root.
    pub subdirectory: String,
    /// Branch, tag or ref to fetch. Empty means the remote's default branch.
    pub revision: String,
}

impl RepoReference {
    /// Creates a reference, normalizing the package path.
    pub fn new(
        remote: impl Into<String>,
        subdirectory: impl AsRef<str>,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            remote: remote.into(),
            subdirectory: normalize_subdirectory(subdirectory.as_ref()),
            revision: revision.into(),
        }
    }

    /// Returns the same reference pinned to `revision`.
    pub fn with_revision(&self, revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
            ..self.clone()
        }
    }

    /// The URL handed to `git remote add`.
    ///
    /// `org/name` shorthand expands to GitHub, absolute local paths become
    /// `file://` URLs so that shallow fetches work against them, and anything
    /// else is used verbatim.
    pub fn clone_url(&self) -> String {
        let remote = self.remote.as_str();
        if remote.contains("://") || remote.starts_with("git@") {
            return remote.to_string();
        }
        if Path::new(remote).is_absolute() {
            return format!("file://{}", remote);
        }
        if is_github_shorthand(remote) {
            return format!("https://github.com/{}", remote);
        }
        remote.to_string()
    }

    /// Human-facing location of the package, used in error messages instead
    /// of scratch paths.
    pub fn display_location(&self) -> String {
        let mut location = self.remote.clone();
        if !self.subdirectory.is_empty() {
            location = format!("{}/{}", location.trim_end_matches('/'), self.subdirectory);
        }
        if !self.revision.is_empty() {
            location = format!("{}@{}", location, self.revision);
        }
        location
    }

    /// Base name of the package: the last path segment of the package path,
    /// or the repository name when the package is the repository root.
    pub fn package_name(&self) -> String {
        let source = if self.subdirectory.is_empty() {
            self.remote.trim_end_matches('/').trim_end_matches(".git")
        } else {
            self.subdirectory.as_str()
        };
        source
            .rsplit(['/', ':'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(source)
            .to_string()
    }
}

/// Strips leading, trailing and repeated separators from a package path.
pub fn normalize_subdirectory(subdirectory: &str) -> String {
    subdirectory
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns true when the package path has a `..` segment and so could
/// resolve outside the repository checkout.
pub fn escapes_repository(subdirectory: &str) -> bool {
    subdirectory
        .split(['/', '\\'])
        .any(|segment| segment == "..")
}

fn is_github_shorthand(remote: &str) -> bool {
    let segments: Vec<&str> = remote.split('/').collect();
    segments.len() == 2
        && !remote.contains(':')
        && !remote.starts_with('.')
        && segments.iter().all(|segment| !segment.is_empty())
}

/// A package reference parsed from `REPO_URI[.git]/PKG_PATH[@REF]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUri {
    pub remote: String,
    pub subdirectory: String,
    /// `None` when no `@REF` suffix was given.
    pub revision: Option<String>,
}

impl PackageUri {
    /// Parses the compact package form.
    ///
    /// The repository and package path are split at the `.git` marker; when it
    /// is absent the whole argument names the repository and the package is
    /// the repository root.
    ///
    /// ```
    /// use confpkg::reference::PackageUri;
    ///
    /// let uri = PackageUri::parse("https://github.com/org/repo.git/charts/redis@v1.2.0");
    /// assert_eq!(uri.remote, "https://github.com/org/repo.git");
    /// assert_eq!(uri.subdirectory, "charts/redis");
    /// assert_eq!(uri.revision.as_deref(), Some("v1.2.0"));
    /// ```
    pub fn parse(input: &str) -> Self {
        let (location, revision) = split_revision(input);

        let (remote, subdirectory) = match location.find(".git/") {
            Some(index) => {
                let split = index + ".git".len();
                (&location[..split], &location[split..])
            }
            None => (location.trim_end_matches('/'), ""),
        };

        Self {
            remote: remote.to_string(),
            subdirectory: normalize_subdirectory(subdirectory),
            revision,
        }
    }
}

/// Splits a trailing `@REF` off the argument. Only an `@` in the path part
/// counts; the user part of `ssh://git@host/...` or `git@host:org/repo` does
/// not.
fn split_revision(input: &str) -> (&str, Option<String>) {
    let path_start = match input.find("://") {
        Some(scheme_end) => {
            let authority = scheme_end + "://".len();
            input[authority..]
                .find('/')
                .map_or(input.len(), |offset| authority + offset)
        }
        None => match (input.find('@'), input.find(':')) {
            (Some(at), Some(colon)) if at < colon => colon + 1,
            _ => 0,
        },
    };

    match input[path_start..].find('@') {
        Some(offset) => {
            let at = path_start + offset;
            let revision = &input[at + 1..];
            let revision = (!revision.is_empty()).then(|| revision.to_string());
            (&input[..at], revision)
        }
        None => (input, None),
    }
}
