//! Random player for the "lowest unique number" game.
//!
//! The player speaks the host's whitespace-delimited text protocol: it
//! announces `ready`, remembers the player and option counts from `start`,
//! answers every `yourmove` with a uniformly random legal value, and skips the
//! `move` broadcast that closes each round.
//!
//! - **[`core`]**: pure protocol rules (command table, session values, parse
//!   policy, move selection). No I/O.
//! - **[`io`]**: the token reader, the flushing line writer, and config loading.
//! - **[`agent`]**: the dispatch loop tying both together.

pub mod agent;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{Dispatch, ProtocolAgent, RunSummary};
pub use error::AgentError;
