//! Application-wide constants.

/// Name under which the desaturation effect is attached to an actor.
///
/// At most one effect with this name may be attached to any actor.
pub const EFFECT_NAME: &str = "grayscale-color";

/// Desaturation factor applied by every grayscale effect (1.0 = fully gray).
pub const GRAYSCALE_FACTOR: f32 = 1.0;

/// Settings key holding the accelerators for the focused-window toggle.
pub const WINDOW_SHORTCUT: &str = "grayscale-window-shortcut";

/// Settings key holding the accelerators for the whole-shell toggle.
pub const GLOBAL_SHORTCUT: &str = "grayscale-global-shortcut";

/// Directory name used under the user configuration directories.
pub const APP_DIR_NAME: &str = "grayscale";

/// Environment variable read by the log filter.
pub const LOG_ENV_VAR: &str = "GRAYSCALE_LOG";
