//! Deterministic protocol logic.
//!
//! Core modules perform no I/O. They map tokens to commands, hold session
//! values, and decide how arguments and moves are validated, so every rule can
//! be tested without a stream.

pub mod command;
pub mod moves;
pub mod parse;
pub mod session;
