//! Whitespace tokenizer over the inbound command stream.

use std::collections::VecDeque;
use std::io::{self, BufRead, Read};

/// Longest token accepted, matching the host-side scanners' buffer size.
pub const MAX_TOKEN_BYTES: usize = 64 * 1024;

/// Reads whitespace-delimited tokens one at a time.
///
/// Input is pulled a line at a time, so a token is returned as soon as its
/// line is complete. The reader never blocks waiting for tokens past the
/// current line. A line longer than [`MAX_TOKEN_BYTES`] is consumed in chunks;
/// only a single token over that size is an error. Bytes that are not valid
/// UTF-8 are decoded lossily.
#[derive(Debug)]
pub struct TokenReader<R> {
    inner: R,
    pending: VecDeque<String>,
    // Unterminated tail carried over from the previous chunk.
    line: Vec<u8>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            line: Vec::new(),
        }
    }

    /// Next token, or `None` once the stream is exhausted.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let room = (MAX_TOKEN_BYTES + 1 - self.line.len()) as u64;
            let read = (&mut self.inner)
                .take(room)
                .read_until(b'\n', &mut self.line)?;
            if read == 0 && self.line.is_empty() {
                return Ok(None);
            }

            // A chunk cut off mid-token keeps that token's bytes for the next read.
            let complete = read == 0 || self.line.last().is_some_and(u8::is_ascii_whitespace);
            let split_at = if complete {
                self.line.len()
            } else {
                self.line
                    .iter()
                    .rposition(u8::is_ascii_whitespace)
                    .map_or(0, |i| i + 1)
            };
            let tail = self.line.split_off(split_at);
            if tail.len() > MAX_TOKEN_BYTES {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("token longer than {MAX_TOKEN_BYTES} bytes"),
                ));
            }
            let text = String::from_utf8_lossy(&self.line);
            self.pending
                .extend(text.split_whitespace().map(str::to_owned));
            self.line = tail;
        }
        Ok(self.pending.pop_front())
    }

    /// Read and drop up to `count` tokens. Returns how many were dropped;
    /// fewer than `count` means the stream ended.
    pub fn skip(&mut self, count: usize) -> io::Result<usize> {
        for skipped in 0..count {
            if self.next_token()?.is_none() {
                return Ok(skipped);
            }
        }
        Ok(count)
    }
}
