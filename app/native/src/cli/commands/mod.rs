//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `config_cmd` - Configuration file management commands
//! - `demo` - Simulated desktop session driving the effect manager

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config::{self, SettingsSource};
use crate::error::GrayscaleError;
use crate::{logging, schema};

pub mod config_cmd;
pub mod demo;

// Re-export commonly used types for convenience
pub use config_cmd::ConfigCommands;
pub use demo::DemoArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Binary name used for completions.
const BIN_NAME: &str = "grayscale";

/// Grayscale CLI - desaturate the focused window or the whole shell.
#[derive(Parser, Debug)]
#[command(name = "grayscale")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Log debug output to stderr.
    ///
    /// The `GRAYSCALE_LOG` environment variable takes precedence.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Configuration file management commands.
    ///
    /// Initialize, view, and manage the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Grayscale configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// Grayscale configuration file. Can be redirected to a file for use with
    /// editors that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(grayscale completions --shell zsh)"
    ///   grayscale completions --shell bash > ~/.local/share/bash-completion/completions/grayscale
    ///   grayscale completions --shell fish > ~/.config/fish/completions/grayscale.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },

    /// Run a simulated desktop session.
    ///
    /// Builds an in-memory desktop, enables the extension against it, runs
    /// the given steps in order and prints the resulting effect state.
    Demo(DemoArgs),
}

impl Cli {
    /// Returns the settings source selected by the --config flag.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom path was given and does not exist.
    pub fn settings_source(&self) -> Result<SettingsSource, GrayscaleError> {
        let source = config::source_for(self.config.as_deref());
        if let SettingsSource::Path(ref path) = source
            && !path.exists()
        {
            return Err(GrayscaleError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        Ok(source)
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), GrayscaleError> {
        logging::init(self.verbose);

        match &self.command {
            Commands::Config(cmd) => config_cmd::execute(cmd, self),
            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }
            Commands::Completions { shell } => {
                print_completions(*shell);
                Ok(())
            }
            Commands::Demo(args) => demo::execute(args, &self.settings_source()?),
        }
    }
}

/// Print shell completions to stdout.
fn print_completions<G: Generator>(generator: G) {
    let mut cmd = Cli::command();
    generate(generator, &mut cmd, BIN_NAME, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_schema() {
        let cli = Cli::try_parse_from(["grayscale", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "grayscale",
            "config",
            "show",
            "--config",
            "/tmp/grayscale.jsonc",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/grayscale.jsonc"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["grayscale", "completions", "--shell", "zsh"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Zsh }));
    }

    #[test]
    fn test_parse_completions_requires_shell() {
        assert!(Cli::try_parse_from(["grayscale", "completions"]).is_err());
    }

    #[test]
    fn test_parse_demo_with_steps() {
        let cli = Cli::try_parse_from([
            "grayscale",
            "demo",
            "--windows",
            "2",
            "--focus",
            "1",
            "toggle-window",
            "focus:0",
        ])
        .unwrap();
        let Commands::Demo(args) = cli.command else {
            panic!("expected demo command");
        };
        assert_eq!(args.windows, 2);
        assert_eq!(args.focus, Some(1));
        assert_eq!(args.steps.len(), 2);
    }

    #[test]
    fn test_settings_source_defaults_to_search() {
        let cli = Cli::try_parse_from(["grayscale", "schema"]).unwrap();
        assert_eq!(cli.settings_source().unwrap(), SettingsSource::Search);
    }

    #[test]
    fn test_settings_source_rejects_missing_file() {
        let cli = Cli::try_parse_from([
            "grayscale",
            "schema",
            "--config",
            "/nonexistent/grayscale/config.jsonc",
        ])
        .unwrap();
        let err = cli.settings_source().unwrap_err();
        assert!(matches!(err, GrayscaleError::ConfigError(_)));
    }

    #[test]
    fn test_settings_source_accepts_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["grayscale", "schema", "--config", &path]).unwrap();
        assert_eq!(cli.settings_source().unwrap(), SettingsSource::Path(file.path().to_path_buf()));
    }
}
