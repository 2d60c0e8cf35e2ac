//! Named control commands that bypass the character table.
//!
//! A command is a single key tap with no modifier and no dead-key handling.
//! Hosts request commands by token; tokens are matched exactly and
//! case-sensitively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::keycode::Keycode;

/// Error returned when a token names no known command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown command: {0:?}")]
pub struct ParseCommandError(pub String);

/// A named command bound 1:1 to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Backspace,
    Enter,
    Tab,
}

impl Command {
    /// Every command, in token order.
    pub const ALL: [Command; 3] = [Command::Backspace, Command::Enter, Command::Tab];

    /// The key tapped for this command.
    pub const fn keycode(self) -> Keycode {
        match self {
            Command::Backspace => Keycode::Backspace,
            Command::Enter => Keycode::Enter,
            Command::Tab => Keycode::Tab,
        }
    }

    /// The token a host uses to request this command.
    pub const fn token(self) -> &'static str {
        match self {
            Command::Backspace => "BACK",
            Command::Enter => "RETURN",
            Command::Tab => "TAB",
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.token() == s)
            .ok_or_else(|| ParseCommandError(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
