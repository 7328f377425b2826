//! Demo CLI command.
//!
//! Runs the extension against an in-memory desktop so the effect state can be
//! inspected without a compositor.

use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config::SettingsSource;
use crate::error::GrayscaleError;
use crate::extension::{Activation, GrayscaleExtension};
use crate::hotkey::{Accelerator, Action, RecordingRegistry};
use crate::host::memory::{DesktopLayout, MemoryHost};
use crate::host::{ActorId, Host};
use crate::manager::ActorStatus;
use crate::toggle::GlobalState;

/// Arguments of the demo command.
#[derive(Args, Debug)]
#[command(after_long_help = r#"Steps:
  enable            Enable the extension (restores tagged windows)
  disable           Disable the extension (keeps window tags)
  toggle-window     Run the focused-window toggle
  toggle-global     Run the whole-shell toggle
  press:<ACCEL>     Press a shortcut, e.g. press:<Super>g
  focus:<i>         Focus window i
  unfocus           Clear input focus
  open              Open a new, unfocused window
  close:<i>         Close window i
  wait:<ms>         Sleep, e.g. to edit the config file under --watch

Examples:
  grayscale demo enable toggle-window
  grayscale demo --windows 3 --focus 1 enable toggle-global disable enable
  grayscale demo --json enable 'press:<Super>g'
  grayscale demo --watch enable wait:10000 'press:<Alt>g'"#)]
pub struct DemoArgs {
    /// Number of open windows.
    #[arg(long, short, default_value_t = 2, value_name = "N")]
    pub windows: usize,

    /// Index of the window holding focus at start.
    #[arg(long, short, value_name = "INDEX")]
    pub focus: Option<usize>,

    /// Number of actors in the background layer (wallpaper, desktop icons).
    #[arg(long, short, default_value_t = 2, value_name = "N")]
    pub background: usize,

    /// Output the final state in JSON format.
    #[arg(long, short)]
    pub json: bool,

    /// Watch the configuration file and pick up shortcut changes between steps.
    #[arg(long)]
    pub watch: bool,

    /// Steps to run, in order. Defaults to a single `enable`.
    #[arg(value_name = "STEP")]
    pub steps: Vec<Step>,
}

/// One action of a demo session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Enable,
    Disable,
    ToggleWindow,
    ToggleGlobal,
    Press(Accelerator),
    Focus(usize),
    Unfocus,
    Open,
    Close(usize),
    Wait(u64),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((name, arg)) = s.split_once(':') {
            return match name.to_lowercase().as_str() {
                "press" => arg.parse::<Accelerator>().map(Self::Press).map_err(|e| e.to_string()),
                "focus" => parse_index(arg).map(Self::Focus),
                "close" => parse_index(arg).map(Self::Close),
                "wait" => arg.trim().parse().map(Self::Wait).map_err(|_| format!("invalid duration '{arg}'")),
                _ => Err(format!("unknown step '{s}'")),
            };
        }

        match s.to_lowercase().as_str() {
            "enable" => Ok(Self::Enable),
            "disable" => Ok(Self::Disable),
            "toggle-window" => Ok(Self::ToggleWindow),
            "toggle-global" => Ok(Self::ToggleGlobal),
            "unfocus" => Ok(Self::Unfocus),
            "open" => Ok(Self::Open),
            _ => Err(format!("unknown step '{s}'")),
        }
    }
}

fn parse_index(arg: &str) -> Result<usize, String> {
    arg.trim().parse().map_err(|_| format!("invalid window index '{arg}'"))
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enable => write!(f, "enable"),
            Self::Disable => write!(f, "disable"),
            Self::ToggleWindow => write!(f, "toggle-window"),
            Self::ToggleGlobal => write!(f, "toggle-global"),
            Self::Press(accelerator) => write!(f, "press:{accelerator}"),
            Self::Focus(index) => write!(f, "focus:{index}"),
            Self::Unfocus => write!(f, "unfocus"),
            Self::Open => write!(f, "open"),
            Self::Close(index) => write!(f, "close:{index}"),
            Self::Wait(millis) => write!(f, "wait:{millis}"),
        }
    }
}

/// Final state of a demo session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoReport {
    pub enabled: bool,
    pub global: GlobalState,
    pub tagged_windows: usize,
    pub desynced: Vec<ActorId>,
    pub actors: Vec<ActorStatus>,
}

/// A simulated desktop with the extension loaded.
#[derive(Debug)]
pub struct DemoSession {
    host: MemoryHost,
    layout: DesktopLayout,
    registry: RecordingRegistry,
    extension: GrayscaleExtension,
}

impl DemoSession {
    /// Builds the desktop described by `args`. The extension starts disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the focus index is out of range.
    pub fn new(args: &DemoArgs, source: SettingsSource) -> Result<Self, GrayscaleError> {
        if let Some(focus) = args.focus
            && focus >= args.windows
        {
            return Err(GrayscaleError::InvalidArguments(format!(
                "--focus {focus} is out of range for {} window(s)",
                args.windows
            )));
        }

        let (host, layout) = MemoryHost::desktop(args.background, args.windows, args.focus);
        Ok(Self {
            host,
            layout,
            registry: RecordingRegistry::new(),
            extension: GrayscaleExtension::new(source).with_settings_watch(args.watch),
        })
    }

    fn window(&self, index: usize) -> Result<ActorId, GrayscaleError> {
        self.layout.windows.get(index).copied().ok_or_else(|| {
            GrayscaleError::InvalidArguments(format!(
                "window index {index} is out of range ({} window(s))",
                self.layout.windows.len()
            ))
        })
    }

    /// Runs one step and describes what happened.
    ///
    /// Settings reloaded by the config watcher are applied before the step runs,
    /// the way a compositor main loop would between events.
    ///
    /// # Errors
    ///
    /// Returns an error if the step names a window that does not exist or has
    /// already been closed.
    pub fn run_step(&mut self, step: &Step) -> Result<String, GrayscaleError> {
        tracing::debug!(%step, "running demo step");
        let reloaded = self.extension.refresh_keybindings(&mut self.registry);

        let outcome = match step {
            Step::Enable => {
                if self.extension.is_enabled() {
                    "already enabled".to_string()
                } else {
                    let restored = self.extension.enable(&mut self.host, &mut self.registry);
                    format!("enabled, {restored} window(s) restored")
                }
            }
            Step::Disable => {
                if self.extension.is_enabled() {
                    self.extension.disable(&mut self.host, &mut self.registry);
                    "disabled".to_string()
                } else {
                    "already disabled".to_string()
                }
            }
            Step::ToggleWindow => describe(self.extension.activate(Action::ToggleWindow, &mut self.host)),
            Step::ToggleGlobal => describe(self.extension.activate(Action::ToggleGlobal, &mut self.host)),
            Step::Press(accelerator) => match self.registry.fire(accelerator) {
                Some(action) => describe(self.extension.activate(action, &mut self.host)),
                None => format!("{accelerator} is not bound"),
            },
            Step::Focus(index) => {
                let actor = self.window(*index)?;
                self.host.set_focus(Some(actor));
                match self.host.focused_actor() {
                    Some(focused) => format!("{focused} focused"),
                    None => format!("window {index} is closed, focus cleared"),
                }
            }
            Step::Unfocus => {
                self.host.set_focus(None);
                "focus cleared".to_string()
            }
            Step::Open => {
                let actor = self.host.add_window(false);
                self.layout.windows.push(actor);
                format!("{actor} opened as window {}", self.layout.windows.len() - 1)
            }
            Step::Close(index) => {
                let actor = self.window(*index)?;
                // Fails with a stale-actor error once the window is gone.
                self.host.meta_window(actor)?;
                self.host.remove_window(actor);
                format!("{actor} closed")
            }
            Step::Wait(millis) => {
                thread::sleep(Duration::from_millis(*millis));
                format!("waited {millis} ms")
            }
        };

        if reloaded {
            return Ok(format!("keybindings reloaded, {outcome}"));
        }
        Ok(outcome)
    }

    /// Returns the current effect state.
    #[must_use]
    pub fn report(&self) -> DemoReport {
        let manager = self.extension.manager();
        DemoReport {
            enabled: self.extension.is_enabled(),
            global: manager.global_state(),
            tagged_windows: manager.binder().tags().len(),
            desynced: manager.desynced_actors(&self.host),
            actors: manager.snapshot(&self.host),
        }
    }
}

fn describe(activation: Activation) -> String {
    match activation {
        Activation::Ignored => "ignored, extension disabled".to_string(),
        Activation::NoFocusedWindow => "no focused window".to_string(),
        Activation::Window(true) => "focused window grayscale on".to_string(),
        Activation::Window(false) => "focused window grayscale off".to_string(),
        Activation::Global(state) => format!("global grayscale {state}"),
    }
}

/// Execute the demo command.
///
/// # Errors
///
/// Returns an error if the arguments describe an invalid desktop or a step
/// names a missing window.
pub fn execute(args: &DemoArgs, source: &SettingsSource) -> Result<(), GrayscaleError> {
    let mut session = DemoSession::new(args, source.clone())?;
    let steps = if args.steps.is_empty() { vec![Step::Enable] } else { args.steps.clone() };

    let mut outcomes = Vec::with_capacity(steps.len());
    for step in &steps {
        outcomes.push((step.to_string(), session.run_step(step)?));
    }

    let report = session.report();

    if args.json {
        let value = serde_json::json!({
            "steps": outcomes
                .iter()
                .map(|(step, outcome)| serde_json::json!({ "step": step, "outcome": outcome }))
                .collect::<Vec<_>>(),
            "state": report,
        });
        output::print_highlighted_json(&value);
        return Ok(());
    }

    println!("{}", "Steps".bold());
    for (i, (step, outcome)) in outcomes.iter().enumerate() {
        println!("  {}. {} {}", i + 1, step.cyan(), format!("→ {outcome}").dimmed());
    }
    println!();
    print_report(&report);

    Ok(())
}

fn print_report(report: &DemoReport) {
    #[derive(Tabled)]
    struct ActorRow {
        #[tabled(rename = "Actor")]
        actor: String,
        #[tabled(rename = "Kind")]
        kind: String,
        #[tabled(rename = "Window")]
        window: String,
        #[tabled(rename = "Focused")]
        focused: String,
        #[tabled(rename = "Grayscale")]
        grayscale: String,
        #[tabled(rename = "Tagged")]
        tagged: String,
    }

    let rows: Vec<ActorRow> = report
        .actors
        .iter()
        .map(|status| ActorRow {
            actor: status.actor.to_string(),
            kind: status.kind.to_string(),
            window: status.window.map_or_else(|| "-".to_string(), |window| window.to_string()),
            focused: output::format_bool(status.focused),
            grayscale: output::format_bool(status.grayscale),
            tagged: output::format_bool(status.tagged),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..6)).with(Alignment::center()))
        .to_string();

    let count = report.actors.len();
    println!("{}", format!("Actors ({count})").bold());
    println!("{table}");

    let enabled = if report.enabled { "enabled".green() } else { "disabled".red() };
    let global = match report.global {
        GlobalState::On => "on".green(),
        GlobalState::Off => "off".normal(),
    };
    println!("Extension: {enabled}  Global: {global}  Tagged windows: {}", report.tagged_windows);

    if !report.desynced.is_empty() {
        println!("{} {}", "Note:".yellow(), desync_note(report.desynced.len()));
    }
}

fn desync_note(count: usize) -> String {
    format!("{count} actor(s) are missing grayscale while global is on")
}
