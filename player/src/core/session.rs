//! Per-game session values announced by the host's `start` command.

use std::num::NonZeroU64;

use tracing::warn;

use crate::core::command::Command;
use crate::core::parse::ParsePolicy;
use crate::error::AgentError;

/// Values from the most recent `start`.
///
/// Fields hold what the host sent, unvalidated. Validation happens where a
/// value is used, so a lenient session can carry a zero or negative count
/// without ever producing an illegal move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub player_count: i64,
    pub option_count: i64,
}

impl Session {
    pub fn new(player_count: i64, option_count: i64) -> Self {
        Self {
            player_count,
            option_count,
        }
    }

    /// Number of integer tokens carried by a `move` broadcast: the winning
    /// value followed by one move per seat.
    pub fn move_arity(&self, policy: ParsePolicy) -> Result<usize, AgentError> {
        if self.player_count < 0 {
            if policy.is_strict() {
                return Err(AgentError::violation(
                    Command::Move,
                    format!("negative player_count {}", self.player_count),
                ));
            }
            warn!(
                player_count = self.player_count,
                "negative player_count, move carries no tokens"
            );
        }
        let arity = self.player_count.saturating_add(1).max(0);
        Ok(usize::try_from(arity).unwrap_or(usize::MAX))
    }

    /// Size of the legal move range `[1, n]`.
    ///
    /// A session with fewer than one option has no legal range. Lenient
    /// policy collapses it to `[1, 1]`.
    pub fn legal_options(&self, policy: ParsePolicy) -> Result<NonZeroU64, AgentError> {
        let options = u64::try_from(self.option_count)
            .ok()
            .and_then(NonZeroU64::new);
        match (options, policy) {
            (Some(n), _) => Ok(n),
            (None, ParsePolicy::Strict) => Err(AgentError::violation(
                Command::YourMove,
                format!("option_count {} leaves no legal move", self.option_count),
            )),
            (None, ParsePolicy::Lenient) => {
                warn!(
                    option_count = self.option_count,
                    "no legal move range, answering 1"
                );
                Ok(NonZeroU64::MIN)
            }
        }
    }
}
