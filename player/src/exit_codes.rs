//! Stable process exit codes.

/// Host closed the input stream.
pub const OK: i32 = 0;
/// Transport failure, unreadable config, or invalid flags.
pub const IO_FAILURE: i32 = 1;
/// Strict parse policy rejected host input.
pub const PROTOCOL_VIOLATION: i32 = 2;
