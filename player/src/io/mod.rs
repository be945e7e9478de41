//! Stream handles for the host protocol.

pub mod config;
pub mod reply;
pub mod tokens;
