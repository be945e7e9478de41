//! Command table for the host protocol.

use std::fmt;

/// Command selected by a leading token.
///
/// Arguments are not part of the variant: they are read from the stream by the
/// dispatcher, because how many to read depends on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `start <player_count> <self_index> <option_count>`
    Start,
    /// `yourmove`
    YourMove,
    /// `move <m_0> ... <m_player_count>`
    Move,
    /// Anything else. Ignored.
    Unknown,
}

impl Command {
    pub fn from_token(token: &str) -> Self {
        match token {
            "start" => Self::Start,
            "yourmove" => Self::YourMove,
            "move" => Self::Move,
            _ => Self::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::YourMove => "yourmove",
            Self::Move => "move",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
