//! # Revision Resolution
//!
//! Turns a `(subdirectory, revision)` pair into the ordered list of refs the
//! git client should try.
//!
//! Monorepos commonly tag each package independently, prefixing the tag with
//! the package path (`foo/v1.0.0` for the package in `foo/`). When a package
//! path is given, the prefixed form is tried first and the revision exactly as
//! requested second. Resolution never fails here; a ref that does not exist is
//! discovered by the client when it tries to fetch it.

/// Marker that identifies an already fully-qualified ref such as
/// `refs/heads/main` or `refs/tags/v1`. Matched anywhere in the revision, so
/// names like `prefs-v2` also count as qualified.
const QUALIFIED_REF_MARKER: &str = "refs";

/// Returns true when `revision` is a fully-qualified ref that must not be
/// prefixed with the package path.
pub fn is_fully_qualified(revision: &str) -> bool {
    revision.contains(QUALIFIED_REF_MARKER)
}

/// Returns the refs to attempt, in priority order.
///
/// ```
/// use confpkg::resolver::candidate_refs;
///
/// assert_eq!(candidate_refs("foo", "v1"), vec!["foo/v1", "v1"]);
/// assert_eq!(candidate_refs("", "v1"), vec!["v1"]);
/// assert_eq!(candidate_refs("foo", "refs/tags/v1"), vec!["refs/tags/v1"]);
/// ```
pub fn candidate_refs(subdirectory: &str, revision: &str) -> Vec<String> {
    let directory = subdirectory.trim_matches('/');
    if directory.is_empty() || revision.is_empty() || is_fully_qualified(revision) {
        return vec![revision.to_string()];
    }

    vec![format!("{}/{}", directory, revision), revision.to_string()]
}
