//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/gridwarp/config.json`.
//! Every field is optional; anything left out falls back to the compiled-in
//! default.
//!
//! # Example
//!
//! ```json
//! {
//!   "grid_size": 3,
//!   "outer_color": "#ff000000",
//!   "inner_color": "#80ffffff",
//!   "output": "DP-1",
//!   "pan_step": 0.5,
//!   "bindings": {
//!     "h": "cut-left",
//!     "j": "cut-down",
//!     "k": "cut-up",
//!     "l": "cut-right",
//!     "shift+h": "move-left",
//!     "ctrl+j": "scroll-down",
//!     "space": ["left-press"],
//!     "shift+space": ["left-release", "quit"],
//!     "Return": "left-click",
//!     "Escape": "quit"
//!   }
//! }
//! ```
//!
//! A binding key is `+`-separated modifiers (`shift`, `caps`, `ctrl` or
//! `control`, `alt`, `num`, `mod3`, `logo` or `super`, `mod5`) ending in
//! an xkb keysym name.  A lone uppercase letter means Shift plus that
//! letter.  The value is one command or a list run in order.  A
//! `bindings` section replaces the default bindings entirely.

use crate::command::{Button, Command, Direction};
use crate::keyboard::{Bindings, KeyCombo, Mods};
use crate::navigator::DEFAULT_PAN_STEP;
use crate::render::{Argb, Style};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use xkbcommon::xkb::{self, keysyms};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cells per grid side.  Default: `2`.
    pub grid_size: u32,
    /// Color of the outer cell outline.  Default: opaque black.
    pub outer_color: Argb,
    /// Color of the inner cell outline.  Default: opaque white.
    pub inner_color: Argb,
    /// Name of the output to show the overlay on.  Default: the first
    /// output the compositor announces.
    pub output: Option<String>,
    /// Fraction of the viewport size a `move-*` command shifts by.
    /// Default: `0.5`.
    pub pan_step: f64,
    /// Key combo to commands.
    pub bindings: Bindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: 2,
            outer_color: Argb::BLACK,
            inner_color: Argb::WHITE,
            output: None,
            pan_step: DEFAULT_PAN_STEP,
            bindings: default_bindings(),
        }
    }
}

/// The bindings used when the config has no `bindings` section.
pub fn default_bindings() -> Bindings {
    let vim = [
        (keysyms::KEY_h, Direction::Left),
        (keysyms::KEY_j, Direction::Down),
        (keysyms::KEY_k, Direction::Up),
        (keysyms::KEY_l, Direction::Right),
    ];
    let mut by_combo: HashMap<KeyCombo, Vec<Command>> = HashMap::new();
    for (sym, dir) in vim {
        let key = |mods| KeyCombo::new(mods, xkb::Keysym::new(sym));
        by_combo.insert(key(Mods::NONE), vec![Command::Cut(dir)]);
        by_combo.insert(key(Mods::SHIFT), vec![Command::Move(dir)]);
        by_combo.insert(key(Mods::CTRL), vec![Command::Scroll(dir)]);
    }
    by_combo.insert(KeyCombo::plain(keysyms::KEY_u), vec![Command::Undo]);
    by_combo.insert(
        KeyCombo::plain(keysyms::KEY_Return),
        vec![Command::Click(Button::Left)],
    );
    by_combo.insert(
        KeyCombo::new(Mods::SHIFT, xkb::Keysym::new(keysyms::KEY_Return)),
        vec![Command::Click(Button::Right)],
    );
    by_combo.insert(KeyCombo::plain(keysyms::KEY_Escape), vec![Command::Quit]);
    Bindings::new(by_combo)
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&contents)
            .map_err(|e| ConfigError(format!("{}: {}", path.display(), e.0)))
    }

    /// Parse and validate a JSON document.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError(format!("failed to parse: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 1 {
            return Err(ConfigError("grid_size must be at least 1".into()));
        }
        if !self.pan_step.is_finite() || self.pan_step <= 0.0 {
            return Err(ConfigError(format!(
                "pan_step must be a positive number, got {}",
                self.pan_step
            )));
        }
        Ok(())
    }

    /// The grid style derived from this config.
    pub fn style(&self) -> Style {
        Style {
            grid_size: self.grid_size,
            outer_color: self.outer_color,
            inner_color: self.inner_color,
        }
    }

    /// The key bindings of this config.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
