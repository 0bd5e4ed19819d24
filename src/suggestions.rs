//! # Error Suggestions
//!
//! Helpers that turn raw git failures into hints a human can act on. Errors
//! should say what went wrong AND how to fix it; the strings produced here end
//! up in the `hint` field of [`crate::error::Error`] variants.

/// Path segments that browsers put between the repository and the file path
/// (`https://github.com/org/repo/tree/main/pkg`).
const WEB_UI_SEGMENTS: &[&str] = &["blob", "tree"];

/// Fragments of git's stderr that indicate a credential problem.
const AUTH_FAILURE_MARKERS: &[&str] = &[
    "Authentication failed",
    "Permission denied",
    "Could not read from remote repository",
    "could not read Username",
    "terminal prompts disabled",
];

/// Returns the web UI segment (`blob` or `tree`) the package path starts
/// with, if any.
pub fn web_ui_segment(subdirectory: &str) -> Option<&'static str> {
    let first = subdirectory.trim_start_matches('/').split('/').next()?;
    WEB_UI_SEGMENTS.iter().copied().find(|segment| *segment == first)
}

/// Hint for a package path copied from a browser URL.
///
/// ```
/// use confpkg::suggestions::web_ui_hint;
///
/// let hint = web_ui_hint("blob/main/charts/redis").unwrap();
/// assert!(hint.contains("remove /blob/main"));
/// ```
pub fn web_ui_hint(subdirectory: &str) -> Option<String> {
    let segment = web_ui_segment(subdirectory)?;
    let mut parts = subdirectory.trim_start_matches('/').split('/').skip(1);
    let branch = parts.next().filter(|b| !b.is_empty()).unwrap_or("<branch>");
    Some(format!(
        "the package path looks like it was copied from a browser URL; \
         remove /{segment}/{branch} from the url and pass the branch as @REF"
    ))
}

/// Returns true when git's output points at missing or rejected credentials.
pub fn is_auth_failure(stderr: &str) -> bool {
    AUTH_FAILURE_MARKERS
        .iter()
        .any(|marker| stderr.contains(marker))
}

/// Picks the most specific hint for a failed fetch of `remote`.
pub fn git_failure_hint(remote: &str, subdirectory: &str, stderr: &str) -> String {
    if let Some(hint) = web_ui_hint(subdirectory) {
        return hint;
    }
    if is_auth_failure(stderr) {
        return format!(
            "make sure you have access to {remote}; for private repos, ensure you have \
             an SSH key added to ssh-agent, git credentials configured, \
             or a personal access token set up"
        );
    }
    let package = if subdirectory.is_empty() {
        "<DIR>".to_string()
    } else {
        format!("<DIR>/{subdirectory}")
    };
    format!("run 'git clone {remote} <DIR>; stat {package}' to verify credentials and the ref")
}
