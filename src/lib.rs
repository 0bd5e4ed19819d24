//! # confpkg
//!
//! Retrieval and version pinning for configuration packages. A package is a
//! directory inside a remote git repository; fetching it produces a local
//! copy plus a `Pkgfile` recording exactly where it came from, so the copy
//! can later be diffed, updated or fetched again reproducibly.
//!
//! ## Quick Example
//!
//! ```
//! use confpkg::reference::PackageUri;
//! use confpkg::resolver::candidate_refs;
//!
//! let uri = PackageUri::parse("https://github.com/org/charts.git/redis@v1.0.0");
//! assert_eq!(uri.subdirectory, "redis");
//!
//! // Monorepo packages are tagged `<path>/<version>`; that form is tried first.
//! let refs = candidate_refs(&uri.subdirectory, uri.revision.as_deref().unwrap());
//! assert_eq!(refs, vec!["redis/v1.0.0", "v1.0.0"]);
//! ```
//!
//! ## Execution Flow
//!
//! [`fetch::FetchCommand::run`] drives a fetch:
//!
//! 1.  **Validation** of the request and the destination.
//! 2.  **Resolution** of the refs to try ([`resolver`]).
//! 3.  **Materialization** of the ref in a scratch clone ([`git`]), through an
//!     injected process runner ([`process`]).
//! 4.  **Copy** of the package directory to the destination ([`filesystem`]).
//! 5.  **Reconciliation** of the `Pkgfile` with the fetched commit
//!     ([`reconcile`], [`pkgfile`]).
//!
//! The scratch clone ([`scratch`]) is removed on every exit path.

pub mod defaults;
pub mod error;
pub mod fetch;
pub mod filesystem;
pub mod git;
pub mod output;
pub mod pkgfile;
pub mod process;
pub mod reconcile;
pub mod reference;
pub mod resolver;
pub mod scratch;
pub mod suggestions;

#[cfg(test)]
mod resolver_proptest;
