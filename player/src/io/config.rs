//! Optional player configuration (TOML).
//!
//! The protocol itself carries everything a game needs. This file only picks
//! the parse policy and an optional fixed seed for reproducible play.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::core::moves::UniformMoves;
use crate::core::parse::ParsePolicy;

/// Player configuration. Missing fields take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Reject malformed host input instead of reading it as `0`.
    pub strict: bool,

    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn parse_policy(&self) -> ParsePolicy {
        if self.strict {
            ParsePolicy::Strict
        } else {
            ParsePolicy::Lenient
        }
    }

    pub fn move_source(&self) -> UniformMoves<StdRng> {
        match self.seed {
            Some(seed) => UniformMoves::seeded(seed),
            None => UniformMoves::from_entropy(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AgentConfig::default()`.
pub fn load_config(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        return Ok(AgentConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}
