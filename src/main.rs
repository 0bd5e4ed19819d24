//! # confpkg CLI
//!
//! This is the binary entry point for the `confpkg` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Reporting errors with the remote, ref and package path that caused them.
//!
//! The core logic lives in the `confpkg` library crate; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use clap::Parser;
use std::process::ExitCode;

use confpkg::output;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let output = cli.output_config();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", output::error_prefix(&output), e);
            ExitCode::FAILURE
        }
    }
}
