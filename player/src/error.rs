//! Error type shared by the protocol loop and its helpers.

use thiserror::Error;

use crate::core::command::Command;

/// Failure that stops the protocol loop.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The host sent something the strict parse policy refuses.
    #[error("protocol violation in `{command}`: {detail}")]
    ProtocolViolation {
        command: Command,
        detail: String,
    },

    /// The transport failed while reading commands or writing replies.
    #[error("transport i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    pub fn violation(command: Command, detail: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            command,
            detail: detail.into(),
        }
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation { .. })
    }
}
