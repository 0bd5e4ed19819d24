//! # Git Materialization
//!
//! [`GitClient`] turns a [`RepoReference`] into a local working tree by
//! driving the system `git` through an injected [`ProcessRunner`]:
//!
//! 1. allocate a fresh scratch directory and `git init` it;
//! 2. register the remote as `origin`;
//! 3. for each candidate ref from [`candidate_refs`], shallow-fetch it and
//!    hard-reset to `FETCH_HEAD`, stopping at the first that succeeds;
//! 4. if every candidate fails, fetch the whole remote without a depth limit
//!    and hard-reset to the revision exactly as requested;
//! 5. initialize and update submodules recursively;
//! 6. check that any `Pkgfile` in the package uses a known `apiVersion`.
//!
//! The result is a [`Materialized`] value that owns the scratch directory.
//! Dropping it removes the clone, so every exit path of the caller cleans up.
//!
//! Using the system `git` means authentication works the way it does for the
//! user: SSH keys, credential helpers and tokens configured in `~/.gitconfig`.

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::defaults::{DEFAULT_GIT_PROGRAM, FALLBACK_DEFAULT_BRANCH};
use crate::error::{Error, Result};
use crate::pkgfile::read_pkgfile;
use crate::process::{ProcessOutput, ProcessRunner, SystemRunner};
use crate::reference::{escapes_repository, RepoReference};
use crate::resolver::candidate_refs;
use crate::scratch::ScratchDir;
use crate::suggestions::git_failure_hint;

/// Trait for version control operations - allows mocking in tests
pub trait VersionControl: Send + Sync {
    /// Produces a local working tree of `reference` in a fresh scratch
    /// directory.
    fn materialize(&self, reference: &RepoReference) -> Result<Materialized>;

    /// Returns the full commit id the materialized tree is checked out at.
    fn head_commit(&self, materialized: &Materialized) -> Result<String>;

    /// Returns the branch the remote's `HEAD` points to.
    fn default_branch(&self, remote: &RepoReference) -> Result<String>;
}

/// A checked-out revision in a scratch directory.
#[derive(Debug)]
pub struct Materialized {
    /// The requested reference, with an empty revision replaced by the
    /// remote's default branch.
    pub reference: RepoReference,
    /// The candidate ref that was actually fetched.
    pub fetched_ref: String,
    scratch: ScratchDir,
}

impl Materialized {
    /// Root of the scratch clone.
    pub fn root(&self) -> &Path {
        self.scratch.path()
    }

    /// The package directory inside the scratch clone.
    pub fn package_dir(&self) -> PathBuf {
        if self.reference.subdirectory.is_empty() {
            self.root().to_path_buf()
        } else {
            self.root().join(&self.reference.subdirectory)
        }
    }

    /// Removes the scratch clone now rather than at drop.
    pub fn cleanup(self) {
        self.scratch.cleanup();
    }
}

/// Version control client backed by a `git` executable.
pub struct GitClient {
    program: String,
    runner: Box<dyn ProcessRunner>,
    scratch_root: Option<PathBuf>,
}

impl Default for GitClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GitClient {
    /// A client that runs `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_runner(Box::new(SystemRunner))
    }

    /// A client that runs git through `runner`.
    pub fn with_runner(runner: Box<dyn ProcessRunner>) -> Self {
        Self {
            program: DEFAULT_GIT_PROGRAM.to_string(),
            runner,
            scratch_root: None,
        }
    }

    /// Uses `program` instead of `git`.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Allocates scratch directories under `root` instead of the system
    /// temp dir.
    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    fn allocate_scratch(&self) -> Result<ScratchDir> {
        match &self.scratch_root {
            Some(root) => ScratchDir::new_in(root),
            None => ScratchDir::new(),
        }
    }

    /// Runs git and returns its output, whether it succeeded or not.
    fn git(&self, args: &[&str], cwd: Option<&Path>) -> Result<ProcessOutput> {
        debug!("running {} {}", self.program, args.join(" "));
        self.runner
            .run(&self.program, args, cwd)
            .map_err(|e| Error::GitNotFound {
                program: self.program.clone(),
                message: e.to_string(),
            })
    }

    /// Runs git and turns a non-zero exit into a `RevisionControl` error.
    fn git_checked(
        &self,
        args: &[&str],
        cwd: Option<&Path>,
        reference: &RepoReference,
        refs: &[String],
    ) -> Result<ProcessOutput> {
        let output = self.git(args, cwd)?;
        if output.success {
            return Ok(output);
        }
        Err(revision_control_error(
            reference,
            refs,
            operation_name(args),
            &output,
        ))
    }

    /// Shallow-fetches `candidate` and resets to it. Returns the failing
    /// output when either step fails.
    fn fetch_shallow(&self, dir: &Path, candidate: &str) -> Result<Option<ProcessOutput>> {
        let fetch = self.git(&["fetch", "origin", "--depth=1", candidate], Some(dir))?;
        if !fetch.success {
            return Ok(Some(fetch));
        }
        let reset = self.git(&["reset", "--hard", "FETCH_HEAD"], Some(dir))?;
        if !reset.success {
            return Ok(Some(reset));
        }
        Ok(None)
    }

    /// Fetches all of `origin` and resets to the requested revision.
    fn fetch_full(&self, dir: &Path, reference: &RepoReference, refs: &[String]) -> Result<()> {
        self.git_checked(&["fetch", "origin"], Some(dir), reference, refs)?;
        self.git_checked(
            &["reset", "--hard", reference.revision.as_str()],
            Some(dir),
            reference,
            refs,
        )?;
        Ok(())
    }

    /// Rejects a package whose `Pkgfile` this build cannot read, reporting
    /// the remote location rather than the scratch path.
    fn check_pkgfile(&self, materialized: &Materialized) -> Result<()> {
        match read_pkgfile(&materialized.package_dir()) {
            Ok(_) => Ok(()),
            Err(Error::UnknownPkgfileVersion { version, .. }) => Err(Error::UnknownPkgfileVersion {
                version,
                location: materialized.reference.display_location(),
            }),
            Err(Error::Pkgfile { message, .. }) => Err(Error::Pkgfile {
                location: materialized.reference.display_location(),
                message,
            }),
            Err(e) => Err(e),
        }
    }
}

impl VersionControl for GitClient {
    fn materialize(&self, reference: &RepoReference) -> Result<Materialized> {
        if escapes_repository(&reference.subdirectory) {
            return Err(Error::InvalidSubdirectory {
                subdirectory: reference.subdirectory.clone(),
            });
        }
        let scratch = self.allocate_scratch()?;
        let dir = scratch.path();
        let url = reference.clone_url();
        info!("fetching {}", reference.display_location());

        self.git_checked(&["init", "--quiet"], Some(dir), reference, &[])?;
        self.git_checked(
            &["remote", "add", "origin", url.as_str()],
            Some(dir),
            reference,
            &[],
        )?;

        let reference = if reference.revision.is_empty() {
            let branch = self.default_branch(reference)?;
            debug!("using default branch {} of {}", branch, reference.remote);
            reference.with_revision(branch)
        } else {
            reference.clone()
        };

        let candidates = candidate_refs(&reference.subdirectory, &reference.revision);
        let mut fetched_ref = None;
        for candidate in &candidates {
            match self.fetch_shallow(dir, candidate)? {
                None => {
                    fetched_ref = Some(candidate.clone());
                    break;
                }
                Some(output) => debug!(
                    "shallow fetch of {} failed: {}",
                    candidate,
                    output.diagnostics()
                ),
            }
        }

        let fetched_ref = match fetched_ref {
            Some(fetched) => fetched,
            None => {
                info!(
                    "shallow fetch of {} failed, fetching full history of {}",
                    candidates.join(", "),
                    reference.remote
                );
                self.fetch_full(dir, &reference, &candidates)?;
                reference.revision.clone()
            }
        };

        let attempted = [fetched_ref.clone()];
        self.git_checked(
            &["submodule", "update", "--init", "--recursive"],
            Some(dir),
            &reference,
            &attempted,
        )?;

        let materialized = Materialized {
            reference,
            fetched_ref,
            scratch,
        };
        self.check_pkgfile(&materialized)?;
        Ok(materialized)
    }

    fn head_commit(&self, materialized: &Materialized) -> Result<String> {
        let reference = &materialized.reference;
        let output = self.git_checked(
            &["rev-parse", "--verify", "HEAD"],
            Some(materialized.root()),
            reference,
            &[materialized.fetched_ref.clone()],
        )?;

        let commit = output.stdout.trim();
        if !is_commit_id(commit) {
            return Err(Error::UnresolvedCommit {
                remote: reference.remote.clone(),
                output: commit.to_string(),
            });
        }
        Ok(commit.to_string())
    }

    fn default_branch(&self, remote: &RepoReference) -> Result<String> {
        let url = remote.clone_url();
        let output = self.git_checked(
            &["ls-remote", "--symref", url.as_str(), "HEAD"],
            None,
            remote,
            &["HEAD".to_string()],
        )?;
        Ok(parse_symref_head(&output.stdout).unwrap_or_else(|| {
            debug!(
                "{} does not advertise HEAD, assuming {}",
                remote.remote, FALLBACK_DEFAULT_BRANCH
            );
            FALLBACK_DEFAULT_BRANCH.to_string()
        }))
    }
}

/// Extracts the branch from `ls-remote --symref` output
/// (`ref: refs/heads/main\tHEAD`).
pub fn parse_symref_head(ls_remote: &str) -> Option<String> {
    ls_remote.lines().find_map(|line| {
        let (target, name) = line.strip_prefix("ref:")?.split_once('\t')?;
        if name.trim() != "HEAD" {
            return None;
        }
        let target = target.trim();
        Some(
            target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string(),
        )
    })
}

/// Returns true for a full SHA-1 or SHA-256 commit id.
pub fn is_commit_id(value: &str) -> bool {
    matches!(value.len(), 40 | 64)
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

fn operation_name(args: &[&str]) -> String {
    match args {
        [] => String::new(),
        ["remote", sub, ..] | ["submodule", sub, ..] => format!("{} {}", args[0], sub),
        [command, ..] => command.to_string(),
    }
}

fn revision_control_error(
    reference: &RepoReference,
    refs: &[String],
    operation: String,
    output: &ProcessOutput,
) -> Error {
    let message = output.diagnostics().to_string();
    let hint = git_failure_hint(&reference.remote, &reference.subdirectory, &message);
    Error::RevisionControl {
        remote: reference.remote.clone(),
        refs: refs.to_vec(),
        operation,
        message,
        hint: Some(hint),
    }
}
