//! Test-only helpers for driving the protocol loop.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::num::NonZeroU64;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use wait_timeout::ChildExt;

use crate::agent::{ProtocolAgent, RunSummary};
use crate::core::moves::{MoveSource, UniformMoves};
use crate::core::parse::ParsePolicy;
use crate::error::AgentError;

/// Move source that replays predetermined values.
///
/// Each value is clamped into the legal range it is asked for, and the script
/// restarts from the top once exhausted. The ranges it was asked for are
/// recorded for assertions.
#[derive(Debug, Clone)]
pub struct ScriptedMoves {
    script: VecDeque<u64>,
    original: Vec<u64>,
    pub requested: Vec<u64>,
}

impl ScriptedMoves {
    pub fn new(script: impl IntoIterator<Item = u64>) -> Self {
        let original: Vec<u64> = script.into_iter().collect();
        Self {
            script: original.iter().copied().collect(),
            original,
            requested: Vec::new(),
        }
    }
}

impl MoveSource for ScriptedMoves {
    fn choose(&mut self, options: NonZeroU64) -> u64 {
        self.requested.push(options.get());
        if self.script.is_empty() {
            self.script.extend(self.original.iter().copied());
        }
        let next = self.script.pop_front().unwrap_or(1);
        next.clamp(1, options.get())
    }
}

/// Everything one run of the loop produced.
#[derive(Debug)]
pub struct Transcript {
    pub lines: Vec<String>,
    pub result: Result<RunSummary, AgentError>,
}

impl Transcript {
    /// Lines after `ready`, parsed as moves.
    pub fn moves(&self) -> Vec<u64> {
        self.lines
            .iter()
            .skip(1)
            .map(|line| line.parse().expect("numeric move line"))
            .collect()
    }
}

/// Run the loop over `input` with any move source.
pub fn play_with<M: MoveSource>(input: &str, policy: ParsePolicy, moves: M) -> Transcript {
    let mut agent = ProtocolAgent::new(input.as_bytes(), Vec::new(), moves, policy);
    let result = agent.run();
    let out = String::from_utf8(agent.into_output()).expect("utf8 output");
    Transcript {
        lines: out.lines().map(str::to_owned).collect(),
        result,
    }
}

/// Run the loop over `input` with a seeded uniform source.
pub fn play(input: &str, policy: ParsePolicy, seed: u64) -> Transcript {
    play_with(input, policy, UniformMoves::seeded(seed))
}

/// Output of the player binary.
#[derive(Debug)]
pub struct BinaryRun {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn the player binary, feed `input` on stdin, close it, and wait.
///
/// Output is drained on reader threads while the child runs. Fails instead of
/// hanging if the process outlives `timeout`.
pub fn run_binary(bin: &str, args: &[&str], input: &str, timeout: Duration) -> Result<BinaryRun> {
    let mut child = Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn {bin}"))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    let stdout_handle = thread::spawn(move || read_all(stdout));
    let stderr_handle = thread::spawn(move || read_all(stderr));

    {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin was not piped"))?;
        // A player that exits early closes its end; the exit status tells why.
        let _ = stdin.write_all(input.as_bytes());
    }

    let status = match child.wait_timeout(timeout).context("wait for player")? {
        Some(status) => status,
        None => {
            child.kill().context("kill player")?;
            child.wait().context("wait player after kill")?;
            return Err(anyhow!("player did not exit within {timeout:?}"));
        }
    };

    Ok(BinaryRun {
        status,
        stdout: join_output(stdout_handle).context("join stdout")?,
        stderr: join_output(stderr_handle).context("join stderr")?,
    })
}

fn read_all(mut pipe: impl Read) -> Result<String> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf).context("read pipe")?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join_output(handle: thread::JoinHandle<Result<String>>) -> Result<String> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}
