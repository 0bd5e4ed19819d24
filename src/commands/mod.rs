//! # CLI Command Implementations
//!
//! Each subcommand of the `confpkg` command-line tool lives in its own file
//! and contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `confpkg` library to do the work.

pub mod get;
