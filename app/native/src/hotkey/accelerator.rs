//! Accelerator parsing.
//!
//! Accepts both the GNOME form (`<Super><Shift>g`) and the plus form
//! (`Super+Shift+G`), normalising modifier aliases:
//! - "Ctrl" and "Primary" are normalized to "Control"
//! - "Cmd", "Command", "Meta", "Win" and "Logo" are normalized to "Super"
//! - "Opt", "Option" and "Mod1" are normalized to "Alt"
//!
//! Single-character keys are lowercased. The canonical display is the GNOME form.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::GrayscaleError;

/// A modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    /// Control.
    Control,
    /// Shift.
    Shift,
    /// Alt / Option.
    Alt,
    /// Super / Command / Windows.
    Super,
}

impl Modifier {
    /// Parses a modifier name or alias, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "primary" => Some(Self::Control),
            "shift" => Some(Self::Shift),
            "alt" | "opt" | "option" | "mod1" => Some(Self::Alt),
            "super" | "cmd" | "command" | "meta" | "win" | "logo" => Some(Self::Super),
            _ => None,
        }
    }

    /// Returns the canonical modifier name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Control => "Control",
            Self::Shift => "Shift",
            Self::Alt => "Alt",
            Self::Super => "Super",
        }
    }
}

/// A parsed key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accelerator {
    modifiers: SmallVec<[Modifier; 4]>,
    key: String,
}

impl Accelerator {
    /// Returns the modifiers in canonical order.
    #[must_use]
    pub fn modifiers(&self) -> &[Modifier] { &self.modifiers }

    /// Returns the key name.
    #[must_use]
    pub fn key(&self) -> &str { &self.key }

    fn new(mut modifiers: SmallVec<[Modifier; 4]>, key: &str, source: &str) -> Result<Self, GrayscaleError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(GrayscaleError::invalid_shortcut(source, "missing key"));
        }
        if Modifier::from_name(key).is_some() {
            return Err(GrayscaleError::invalid_shortcut(source, "missing key after modifiers"));
        }

        modifiers.sort_unstable();
        modifiers.dedup();

        let key = match key {
            "`" => "grave".to_string(),
            _ if key.chars().count() == 1 => key.to_lowercase(),
            _ => key.to_string(),
        };
        Ok(Self { modifiers, key })
    }

    fn parse_angle(source: &str) -> Result<Self, GrayscaleError> {
        let mut modifiers = SmallVec::new();
        let mut rest = source;
        while let Some(stripped) = rest.strip_prefix('<') {
            let Some(end) = stripped.find('>') else {
                return Err(GrayscaleError::invalid_shortcut(source, "unterminated '<'"));
            };
            let name = &stripped[..end];
            let modifier = Modifier::from_name(name).ok_or_else(|| {
                GrayscaleError::invalid_shortcut(source, format!("unknown modifier '{name}'"))
            })?;
            modifiers.push(modifier);
            rest = &stripped[end + 1..];
        }
        Self::new(modifiers, rest, source)
    }

    fn parse_plus(source: &str) -> Result<Self, GrayscaleError> {
        let parts: Vec<&str> = source.split('+').collect();
        let Some((key, names)) = parts.split_last() else {
            return Err(GrayscaleError::invalid_shortcut(source, "empty shortcut"));
        };

        let mut modifiers = SmallVec::new();
        for name in names {
            let name = name.trim();
            let modifier = Modifier::from_name(name).ok_or_else(|| {
                GrayscaleError::invalid_shortcut(source, format!("unknown modifier '{name}'"))
            })?;
            modifiers.push(modifier);
        }
        Self::new(modifiers, key, source)
    }
}

impl FromStr for Accelerator {
    type Err = GrayscaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source = s.trim();
        if source.is_empty() {
            return Err(GrayscaleError::invalid_shortcut(s, "empty shortcut"));
        }
        if source.starts_with('<') { Self::parse_angle(source) } else { Self::parse_plus(source) }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "<{}>", modifier.name())?;
        }
        write!(f, "{}", self.key)
    }
}

/// Normalizes an accelerator string to the canonical GNOME form.
///
/// # Errors
///
/// Returns [`GrayscaleError::InvalidShortcut`] if the string cannot be parsed.
pub fn normalize_shortcut(shortcut: &str) -> Result<String, GrayscaleError> {
    shortcut.parse::<Accelerator>().map(|accelerator| accelerator.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_angle_form() {
        let accelerator: Accelerator = "<Super><Shift>g".parse().unwrap();
        assert_eq!(accelerator.modifiers(), &[Modifier::Shift, Modifier::Super]);
        assert_eq!(accelerator.key(), "g");
    }

    #[test]
    fn test_parse_plus_form_matches_angle_form() {
        let plus: Accelerator = "Super+Shift+G".parse().unwrap();
        let angle: Accelerator = "<Shift><Super>g".parse().unwrap();
        assert_eq!(plus, angle);
    }

    #[test]
    fn test_aliases_are_normalized() {
        assert_eq!(normalize_shortcut("Ctrl+Alt+T").unwrap(), "<Control><Alt>t");
        assert_eq!(normalize_shortcut("Cmd+Opt+x").unwrap(), "<Alt><Super>x");
        assert_eq!(normalize_shortcut("<Primary><Meta>F9").unwrap(), "<Control><Super>F9");
        assert_eq!(normalize_shortcut("Win+`").unwrap(), "<Super>grave");
    }

    #[test]
    fn test_duplicate_modifiers_collapse() {
        assert_eq!(normalize_shortcut("<Ctrl><Control>a").unwrap(), "<Control>a");
    }

    #[test]
    fn test_bare_key_is_valid() {
        assert_eq!(normalize_shortcut("F12").unwrap(), "F12");
    }

    #[test]
    fn test_invalid_shortcuts_are_rejected() {
        for shortcut in ["", "   ", "<Super>", "Ctrl+", "<Hyper>g", "Foo+g", "<Super", "Ctrl+Shift"] {
            let err = shortcut.parse::<Accelerator>().unwrap_err();
            assert!(
                matches!(err, GrayscaleError::InvalidShortcut { .. }),
                "expected '{shortcut}' to be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_modifier_is_named() {
        let err = "<Hyper>g".parse::<Accelerator>().unwrap_err();
        assert!(err.to_string().contains("unknown modifier 'Hyper'"));
    }
}
