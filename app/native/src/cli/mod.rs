//! CLI module for Grayscale.
//!
//! This module provides command-line interface functionality: configuration
//! file management, the configuration schema, shell completions, and a
//! simulated session of the effect manager.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::GrayscaleError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), GrayscaleError> {
    let cli = Cli::parse();
    cli.execute()
}
