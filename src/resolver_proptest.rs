//! Property-based tests for revision resolution.
//!
//! These tests use proptest to generate random package paths and revisions
//! and verify that the candidate ordering holds for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::resolver::{candidate_refs, is_fully_qualified};
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9._-]{0,8}"
    }

    fn subdirectory() -> impl Strategy<Value = String> {
        prop::collection::vec(segment(), 1..4).prop_map(|segments| segments.join("/"))
    }

    fn short_revision() -> impl Strategy<Value = String> {
        "v[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}|main|release-[0-9]{1,4}"
    }

    proptest! {
        /// Property: the requested revision is always the last candidate
        #[test]
        fn requested_revision_is_always_tried_last(
            dir in subdirectory(),
            revision in short_revision(),
        ) {
            let candidates = candidate_refs(&dir, &revision);
            prop_assert_eq!(candidates.last(), Some(&revision));
        }

        /// Property: a package path yields exactly `[path/revision, revision]`
        #[test]
        fn package_path_is_tried_first(
            dir in subdirectory(),
            revision in short_revision(),
        ) {
            let candidates = candidate_refs(&dir, &revision);
            prop_assert_eq!(candidates, vec![format!("{}/{}", dir, revision), revision]);
        }

        /// Property: leading and trailing slashes never change the candidates
        #[test]
        fn surrounding_slashes_are_ignored(
            dir in subdirectory(),
            revision in short_revision(),
            leading in 0usize..3,
            trailing in 0usize..3,
        ) {
            let padded = format!("{}{}{}", "/".repeat(leading), dir, "/".repeat(trailing));
            prop_assert_eq!(candidate_refs(&padded, &revision), candidate_refs(&dir, &revision));
        }

        /// Property: fully-qualified refs are never prefixed
        #[test]
        fn fully_qualified_refs_are_used_verbatim(
            dir in subdirectory(),
            kind in "heads|tags",
            name in segment(),
        ) {
            let revision = format!("refs/{}/{}", kind, name);
            prop_assert!(is_fully_qualified(&revision));
            prop_assert_eq!(candidate_refs(&dir, &revision), vec![revision]);
        }

        /// Property: any revision mentioning `refs` is used verbatim
        #[test]
        fn revisions_containing_refs_are_used_verbatim(
            dir in subdirectory(),
            before in "[a-z0-9-]{0,5}",
            after in "[a-z0-9/-]{0,8}",
        ) {
            let revision = format!("{}refs{}", before, after);
            prop_assert_eq!(candidate_refs(&dir, &revision), vec![revision]);
        }

        /// Property: the repository root never produces a prefixed candidate
        #[test]
        fn root_yields_single_candidate(
            slashes in 0usize..3,
            revision in short_revision(),
        ) {
            let root = "/".repeat(slashes);
            prop_assert_eq!(candidate_refs(&root, &revision), vec![revision]);
        }
    }
}
