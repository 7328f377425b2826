//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Grayscale Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
//
// Accelerators use the GNOME form ("<Super><Shift>g") or the plus form
// ("Super+Shift+G"). Each shortcut takes a single accelerator or an array.
// An empty string or array leaves the shortcut unbound.

{
  // "keybindings": {
  //   // Toggle grayscale on the focused window
  //   "grayscale-window-shortcut": "<Super>g",
  //
  //   // Toggle grayscale on the whole shell: background, desktop icons and
  //   // every open window
  //   "grayscale-global-shortcut": "<Super><Shift>g"
  // }
}
"#
    .to_string()
}

/// Writes the configuration template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be written.
pub fn create_config_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, generate_config_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GrayscaleConfig, load_config_from_path};

    #[test]
    fn test_template_parses_to_defaults() {
        let template = generate_config_template();
        let stripped = json_comments::StripComments::new(template.as_bytes());
        let config: GrayscaleConfig = serde_json::from_reader(stripped).unwrap();
        assert_eq!(config, GrayscaleConfig::default());
    }

    #[test]
    fn test_template_mentions_both_shortcuts() {
        let template = generate_config_template();
        assert!(template.contains("grayscale-window-shortcut"));
        assert!(template.contains("grayscale-global-shortcut"));
    }

    #[test]
    fn test_create_config_file_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");

        create_config_file(&path).unwrap();
        assert!(path.exists());
        assert_eq!(load_config_from_path(&path).unwrap(), GrayscaleConfig::default());
    }
}
