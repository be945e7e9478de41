//! Outbound line writer.

use std::fmt::Display;
use std::io::{self, Write};

/// Literal line announcing that the player is listening.
pub const READY: &str = "ready";

/// Writes one protocol line at a time and flushes after each.
#[derive(Debug)]
pub struct ReplyWriter<W> {
    inner: W,
}

impl<W: Write> ReplyWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write `value` followed by `\n`, then flush so the host sees it now.
    pub fn line(&mut self, value: impl Display) -> io::Result<()> {
        writeln!(self.inner, "{value}")?;
        self.inner.flush()
    }

    pub fn ready(&mut self) -> io::Result<()> {
        self.line(READY)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
