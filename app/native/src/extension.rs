//! Extension lifecycle.
//!
//! `GrayscaleExtension` is the glue between the host's enable/disable hooks,
//! its keybinding manager and the [`GrayscaleManager`]:
//!
//! - `enable` loads settings, registers the two shortcuts and re-attaches the
//!   effect to every window that was tagged before the last `disable`.
//! - `disable` removes the shortcuts, strips the effect from every window
//!   (keeping the tags) and drops the settings.
//!
//! Lifecycle failures are logged and never leave the shell unusable.

use crate::config::{ConfigWatcher, GrayscaleConfig, SettingsHandle, SettingsSource, watch_config_file};
use crate::hotkey::{Action, KeybindingRegistry, resolve_accelerators};
use crate::host::Host;
use crate::manager::GrayscaleManager;
use crate::toggle::GlobalState;

/// Outcome of a fired keybinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The extension is disabled; nothing happened.
    Ignored,
    /// No window had focus; nothing happened.
    NoFocusedWindow,
    /// The focused window was toggled to the given state.
    Window(bool),
    /// The whole-shell effect moved to the given state.
    Global(GlobalState),
}

/// The lifecycle adapter.
#[derive(Debug)]
pub struct GrayscaleExtension {
    manager: GrayscaleManager,
    source: SettingsSource,
    settings: Option<SettingsHandle>,
    applied_generation: u64,
    registered: Vec<&'static str>,
    watch_settings: bool,
    watcher: Option<ConfigWatcher>,
}

impl GrayscaleExtension {
    /// Creates a disabled extension reading settings from `source`.
    #[must_use]
    pub fn new(source: SettingsSource) -> Self {
        Self {
            manager: GrayscaleManager::new(),
            source,
            settings: None,
            applied_generation: 0,
            registered: Vec::new(),
            watch_settings: false,
            watcher: None,
        }
    }

    /// Enables hot-reloading of the configuration file while enabled.
    #[must_use]
    pub fn with_settings_watch(mut self, watch: bool) -> Self {
        self.watch_settings = watch;
        self
    }

    /// Returns whether the extension is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool { self.settings.is_some() }

    /// Returns the effect manager.
    #[must_use]
    pub const fn manager(&self) -> &GrayscaleManager { &self.manager }

    /// Returns the settings handle while enabled.
    #[must_use]
    pub const fn settings(&self) -> Option<&SettingsHandle> { self.settings.as_ref() }

    /// Enables the extension.
    ///
    /// Returns the number of windows the effect was restored on.
    pub fn enable<H, R>(&mut self, host: &mut H, registry: &mut R) -> usize
    where
        H: Host + ?Sized,
        R: KeybindingRegistry + ?Sized,
    {
        if self.is_enabled() {
            tracing::debug!("extension already enabled");
            return 0;
        }

        let settings = SettingsHandle::load(&self.source).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load settings, using defaults");
            SettingsHandle::from_config(GrayscaleConfig::default())
        });

        self.register_keybindings(registry, &settings.config());
        self.applied_generation = settings.generation();

        if self.watch_settings {
            self.watcher = watch_config_file(&settings);
        }
        self.settings = Some(settings);

        let restored = self.manager.restore_tagged(host);
        tracing::info!(restored, "grayscale extension enabled");
        restored
    }

    /// Disables the extension.
    ///
    /// Window tags are kept so the next [`enable`](Self::enable) restores them.
    pub fn disable<H, R>(&mut self, host: &mut H, registry: &mut R)
    where
        H: Host + ?Sized,
        R: KeybindingRegistry + ?Sized,
    {
        if !self.is_enabled() {
            tracing::debug!("extension already disabled");
            return;
        }

        self.unregister_keybindings(registry);
        let stripped = self.manager.strip_windows(host);

        self.watcher = None;
        self.settings = None;
        tracing::info!(stripped, "grayscale extension disabled");
    }

    /// Runs the action of a fired keybinding.
    pub fn activate<H: Host + ?Sized>(&mut self, action: Action, host: &mut H) -> Activation {
        if !self.is_enabled() {
            tracing::debug!(?action, "ignoring keybinding while disabled");
            return Activation::Ignored;
        }

        match action {
            Action::ToggleWindow => self
                .manager
                .toggle_focused(host)
                .map_or(Activation::NoFocusedWindow, |(_, enabled)| Activation::Window(enabled)),
            Action::ToggleGlobal => Activation::Global(self.manager.toggle_global(host)),
        }
    }

    /// Re-registers the shortcuts if the settings changed since they were applied.
    ///
    /// Returns `true` if the bindings were refreshed.
    pub fn refresh_keybindings<R: KeybindingRegistry + ?Sized>(&mut self, registry: &mut R) -> bool {
        let Some(settings) = self.settings.clone() else {
            return false;
        };
        let generation = settings.generation();
        if generation == self.applied_generation {
            return false;
        }

        self.unregister_keybindings(registry);
        self.register_keybindings(registry, &settings.config());
        self.applied_generation = generation;
        tracing::info!(generation, "keybindings refreshed from settings");
        true
    }

    fn register_keybindings<R: KeybindingRegistry + ?Sized>(
        &mut self,
        registry: &mut R,
        config: &GrayscaleConfig,
    ) {
        for action in Action::ALL {
            let name = action.settings_key();
            let accelerators = resolve_accelerators(action.shortcut(&config.keybindings));

            match registry.add_keybinding(name, &accelerators, action) {
                Ok(()) => {
                    tracing::debug!(name, count = accelerators.len(), "registered keybinding");
                    self.registered.push(name);
                }
                Err(err) => tracing::warn!(name, error = %err, "failed to register keybinding"),
            }
        }
    }

    fn unregister_keybindings<R: KeybindingRegistry + ?Sized>(&mut self, registry: &mut R) {
        for name in self.registered.drain(..) {
            if !registry.remove_keybinding(name) {
                tracing::debug!(name, "keybinding was already gone");
            }
        }
    }
}
