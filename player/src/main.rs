//! Random player for the "lowest unique number" game.
//!
//! Reads host commands on stdin and answers on stdout. Diagnostics go to
//! stderr (`RUST_LOG`).

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lowest_unique_player::io::config::{AgentConfig, load_config};
use lowest_unique_player::{AgentError, ProtocolAgent, exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "lowest-unique-player",
    version,
    about = "Plays uniformly random legal moves in a lowest-unique-number game"
)]
struct Cli {
    /// Reject malformed host input instead of reading it as 0.
    #[arg(long)]
    strict: bool,

    /// Seed the move generator for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Read settings from a TOML file. Flags override file values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(exit_codes::IO_FAILURE);
        }
        Err(err) => err.exit(),
    };
    if let Err(err) = logging::init() {
        eprintln!("tracing disabled: {err:#}");
    }

    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut agent = ProtocolAgent::new(
        stdin,
        stdout,
        config.move_source(),
        config.parse_policy(),
    );
    agent.run().context("play")?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<AgentConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AgentConfig::default(),
    };
    if cli.strict {
        config.strict = true;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AgentError>() {
        Some(agent_err) if agent_err.is_protocol_violation() => exit_codes::PROTOCOL_VIOLATION,
        _ => exit_codes::IO_FAILURE,
    }
}
