//! Commands and types used throughout gridwarp.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the navigator can perform, and
//! [`Direction`] / [`Button`] provide the supporting data types.
//!
//! Commands are named in kebab-case in the configuration file
//! (`"cut-left"`, `"move-down"`, `"left-click"`, `"left-press"`,
//! `"scroll-up"`, `"undo"`, `"quit"`).

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Direction for narrowing or panning the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A pointer button the virtual pointer can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Middle,
}

impl Button {
    /// The evdev button code (`linux/input-event-codes.h`).
    pub fn code(self) -> u32 {
        const BTN_LEFT: u32 = 0x110;
        const BTN_RIGHT: u32 = 0x111;
        const BTN_MIDDLE: u32 = 0x112;

        match self {
            Button::Left => BTN_LEFT,
            Button::Right => BTN_RIGHT,
            Button::Middle => BTN_MIDDLE,
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Left => write!(f, "left"),
            Button::Right => write!(f, "right"),
            Button::Middle => write!(f, "middle"),
        }
    }
}

/// Every action the navigator can perform.
///
/// Commands are produced by looking up a pressed key in the configured
/// bindings and consumed by the [`Navigator`](crate::navigator::Navigator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Keep the half of the viewport on the given side.
    Cut(Direction),

    /// Shift the viewport by a fraction of its own size.
    Move(Direction),

    /// Warp to the viewport center, click, and exit.
    Click(Button),

    /// Hold a button down at the viewport center.
    Press(Button),

    /// Let go of a held button.
    Release(Button),

    /// Scroll one wheel step at the viewport center.
    Scroll(Direction),

    /// Restore the viewport from before the last cut or move.
    Undo,

    /// Exit without clicking.
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Cut(d) => write!(f, "cut-{}", d),
            Command::Move(d) => write!(f, "move-{}", d),
            Command::Click(b) => write!(f, "{}-click", b),
            Command::Press(b) => write!(f, "{}-press", b),
            Command::Release(b) => write!(f, "{}-release", b),
            Command::Scroll(d) => write!(f, "scroll-{}", d),
            Command::Undo => write!(f, "undo"),
            Command::Quit => write!(f, "quit"),
        }
    }
}

fn parse_direction(s: &str) -> Option<Direction> {
    match s {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

fn parse_button(s: &str) -> Option<Button> {
    match s {
        "left" => Some(Button::Left),
        "right" => Some(Button::Right),
        "middle" => Some(Button::Middle),
        _ => None,
    }
}

impl Command {
    /// Parse a kebab-case command name (case-insensitive, surrounding
    /// whitespace ignored).
    pub fn from_kebab_case(s: &str) -> Option<Command> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "undo" => return Some(Command::Undo),
            "quit" => return Some(Command::Quit),
            _ => {}
        }
        if let Some(dir) = normalized.strip_prefix("cut-") {
            return parse_direction(dir).map(Command::Cut);
        }
        if let Some(dir) = normalized.strip_prefix("move-") {
            return parse_direction(dir).map(Command::Move);
        }
        if let Some(dir) = normalized.strip_prefix("scroll-") {
            return parse_direction(dir).map(Command::Scroll);
        }
        if let Some(button) = normalized.strip_suffix("-click") {
            return parse_button(button).map(Command::Click);
        }
        if let Some(button) = normalized.strip_suffix("-press") {
            return parse_button(button).map(Command::Press);
        }
        if let Some(button) = normalized.strip_suffix("-release") {
            return parse_button(button).map(Command::Release);
        }
        None
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Command::from_kebab_case(&s)
            .ok_or_else(|| DeError::custom(format!("invalid command: {:?}", s)))
    }
}
