//! Config CLI commands.
//!
//! Commands for managing the Grayscale configuration file.

use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;

use super::Cli;
use crate::cli::output;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, SettingsHandle, SettingsSource, config_paths};
use crate::error::GrayscaleError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Creates a new configuration file at the default location with all
    /// available options commented out.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  grayscale config init              # Create config at default location
  grayscale config init --force      # Overwrite existing config
  grayscale config init --path ~/my-config.jsonc  # Create at custom path
  grayscale config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses ~/.config/grayscale/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<String>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the path to the configuration file.
    ///
    /// Displays the paths where Grayscale looks for configuration files and
    /// marks the one in use. With --config, only that file is reported.
    Path,

    /// Show the effective configuration.
    ///
    /// Prints the configuration that would be applied, with defaults filled
    /// in for every missing option.
    Show,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands, cli: &Cli) -> Result<(), GrayscaleError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                print_config_template()
            } else {
                init_config(*force, path.as_deref().map(config::expand_config_path))
            }
        }
        ConfigCommands::Path => show_config_path(cli),
        ConfigCommands::Show => show_config(cli),
    }
}

/// Print the configuration template to stdout.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
fn print_config_template() -> Result<(), GrayscaleError> {
    println!("{}", generate_config_template());
    Ok(())
}

/// Returns where `config init` writes when no path is given.
fn default_init_path() -> PathBuf {
    // Use the first config path (preferred location)
    config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc"))
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), GrayscaleError> {
    let config_path = custom_path.unwrap_or_else(default_init_path);

    if config_path.exists() && !force {
        return Err(GrayscaleError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|e| {
        GrayscaleError::ConfigError(format!(
            "Failed to create config file {}: {e}",
            config_path.display()
        ))
    })?;

    tracing::debug!(path = %config_path.display(), "configuration file created");
    println!("Configuration file created at: {}", config_path.display());
    println!("\nAll options are commented out by default.");
    println!("Edit the file and uncomment the options you want to configure.");

    Ok(())
}

/// Show the configuration file paths, marking the one in use.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
fn show_config_path(cli: &Cli) -> Result<(), GrayscaleError> {
    if let SettingsSource::Path(path) = config::source_for(cli.config.as_deref()) {
        let state = if path.exists() { "(active)".green() } else { "(missing)".red() };
        println!("Custom configuration file: {} {state}", path.display());
        return Ok(());
    }

    let paths = config_paths();
    let active = paths.iter().position(|path| path.exists());

    println!("Configuration file search paths (in priority order):\n");
    for (i, path) in paths.iter().enumerate() {
        let marker = match active {
            Some(index) if index == i => " (active)".green().to_string(),
            Some(_) if path.exists() => " (shadowed)".yellow().to_string(),
            _ => String::new(),
        };
        println!("  {}. {}{marker}", i + 1, path.display());
    }

    if active.is_none() {
        println!("\nNo configuration file found, built-in defaults are used.");
        println!("Run 'grayscale config init' to create one.");
    }

    Ok(())
}

/// Print the effective configuration as highlighted JSON.
fn show_config(cli: &Cli) -> Result<(), GrayscaleError> {
    let settings = SettingsHandle::load(&cli.settings_source()?)?;

    match settings.path() {
        Some(path) => eprintln!("Loaded from: {}", path.display()),
        None => eprintln!("No configuration file found, showing defaults."),
    }

    let value = serde_json::to_value(settings.config())?;
    output::print_highlighted_json(&value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::*;

    #[test]
    fn test_config_paths_returns_non_empty() {
        let paths = config_paths();
        // Should have at least one path (unless no HOME directory)
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }

    #[test]
    fn test_init_config_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");

        init_config(false, Some(path.clone())).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), generate_config_template());
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(&path, "{}").unwrap();

        let err = init_config(false, Some(path.clone())).unwrap_err();

        assert!(matches!(err, GrayscaleError::ConfigError(ref msg) if msg.contains("--force")));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_init_config_force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(&path, "{}").unwrap();

        init_config(true, Some(path.clone())).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), generate_config_template());
    }

    #[test]
    fn test_show_config_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(&path, "{ not json").unwrap();
        let path = path.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["grayscale", "config", "show", "--config", &path]).unwrap();

        assert!(matches!(show_config(&cli), Err(GrayscaleError::ConfigError(_))));
    }
}
