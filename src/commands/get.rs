//! # Get Command Implementation
//!
//! This module implements the `get` subcommand, which fetches a package from a
//! git repository into a local directory and pins it to the commit that was
//! fetched.
//!
//! ## Functionality
//!
//! - **Package argument**: `REPO_URI[.git]/PKG_PATH[@REF]`. The `.git` marker
//!   separates the repository from the package path; without it the whole
//!   repository is the package.
//! - **Default ref**: when no `@REF` (or `--ref`) is given, the remote's
//!   default branch is used.
//! - **Destination**: defaults to the package's base name in the current
//!   directory. An existing destination is an error unless `--overwrite` is
//!   passed.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use confpkg::fetch::FetchCommand;
use confpkg::git::{GitClient, VersionControl};
use confpkg::output::{fetch_summary, OutputConfig};
use confpkg::reference::{PackageUri, RepoReference};

/// Fetch a package from a git repository
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Package to fetch, e.g. https://github.com/org/repo.git/charts/redis@v1.0.0
    #[arg(value_name = "REPO_URI[.git]/PKG_PATH[@REF]")]
    pub package: String,

    /// Local directory to write the package to. Defaults to the package name.
    #[arg(value_name = "DEST")]
    pub destination: Option<PathBuf>,

    /// Package path inside the repository, overriding the one in the package
    /// argument. Use `/` for the repository root.
    #[arg(long, value_name = "PATH")]
    pub directory: Option<String>,

    /// Branch, tag or ref to fetch, overriding `@REF`.
    #[arg(long = "ref", value_name = "REF")]
    pub revision: Option<String>,

    /// Name for the package's Pkgfile if it does not have one. Defaults to the
    /// destination directory name.
    #[arg(long)]
    pub name: Option<String>,

    /// Replace the destination directory if it already exists.
    #[arg(long, visible_alias = "clean")]
    pub overwrite: bool,

    /// The git executable to run.
    #[arg(long, value_name = "PROGRAM", env = "CONFPKG_GIT", default_value = "git")]
    pub git: String,
}

/// Execute the `get` command.
pub fn execute(args: GetArgs, output: &OutputConfig) -> Result<()> {
    let client = GitClient::new().program(args.git.as_str());
    let command = build_command(args, &client)?;

    let outcome = command.run(&client)?;
    println!("{}", fetch_summary(output, &outcome));
    Ok(())
}

/// Turns the parsed arguments into a fetch request, asking the remote for its
/// default branch when no ref was given.
fn build_command(args: GetArgs, vcs: &dyn VersionControl) -> Result<FetchCommand> {
    let uri = PackageUri::parse(&args.package);

    let subdirectory = match args.directory {
        Some(directory) if !directory.is_empty() => directory,
        _ if uri.subdirectory.is_empty() => "/".to_string(),
        _ => uri.subdirectory,
    };

    let revision = match args.revision.or(uri.revision) {
        Some(revision) => revision,
        None => vcs
            .default_branch(&RepoReference::new(&uri.remote, &subdirectory, ""))
            .with_context(|| format!("failed to determine the default branch of {}", uri.remote))?,
    };

    let destination = args.destination.unwrap_or_else(|| {
        PathBuf::from(RepoReference::new(&uri.remote, &subdirectory, &revision).package_name())
    });

    Ok(FetchCommand {
        remote: uri.remote,
        subdirectory,
        revision,
        destination,
        name: args.name,
        overwrite: args.overwrite,
    })
}
