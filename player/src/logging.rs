//! Diagnostic tracing for the player.
//!
//! Stdout belongs to the host protocol, so every event goes to stderr. Nothing
//! here changes what the host sees.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset: lenient-parse fallbacks stay visible,
/// per-token traces stay quiet.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber.
///
/// Colors are only emitted when stderr is a terminal; under a host harness
/// stderr is usually a pipe or a log file.
///
/// # Example
/// ```bash
/// RUST_LOG=lowest_unique_player=debug lowest-unique-player
/// ```
pub fn init() -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_instead_of_panicking() {
        // Only this test installs a global subscriber in the unit-test binary.
        init().expect("first init");
        assert!(init().is_err());
    }
}
