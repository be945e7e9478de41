//! Numeric argument parsing under an explicit policy.
//!
//! The host is expected to send base-10 integers, but a reader has to decide
//! what a missing or malformed argument means. That decision is a named
//! [`ParsePolicy`] rather than an ignored parse error.

use tracing::warn;

use crate::core::command::Command;
use crate::error::AgentError;

/// How malformed or missing numeric arguments are treated.
///
/// `Lenient` reads them as `0` and keeps playing. The host never sees a
/// failure, which also means host-side bugs can go unnoticed: a garbled
/// `start` silently becomes a zero-option session. `Strict` surfaces the same
/// input as [`AgentError::ProtocolViolation`] and stops the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    #[default]
    Lenient,
    Strict,
}

impl ParsePolicy {
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Parse one integer argument of `command`.
///
/// `token` is `None` when the stream ended before the argument arrived.
pub fn parse_int(
    token: Option<&str>,
    command: Command,
    field: &'static str,
    policy: ParsePolicy,
) -> Result<i64, AgentError> {
    let Some(raw) = token else {
        return match policy {
            ParsePolicy::Strict => Err(AgentError::violation(
                command,
                format!("missing {field}: input ended"),
            )),
            ParsePolicy::Lenient => {
                warn!(command = %command, field, "argument missing, reading as 0");
                Ok(0)
            }
        };
    };
    match raw.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(err) => match policy {
            ParsePolicy::Strict => Err(AgentError::violation(
                command,
                format!("{field} {raw:?} is not an integer ({err})"),
            )),
            ParsePolicy::Lenient => {
                warn!(
                    command = %command,
                    field,
                    token = raw,
                    "unparseable argument, reading as 0"
                );
                Ok(0)
            }
        },
    }
}
