//! Console output buffer with tail-search for prompts.
//!
//! Console output during a firmware upgrade is long (boot logs, kernel
//! messages) and only the end of it matters for prompt detection, so
//! prompt regexes are matched against the last `search_depth` bytes only.
//! Literal markers such as the reboot banner can appear anywhere in a burst
//! of output and are searched across the whole unconsumed buffer.

use memchr::memmem;
use regex::bytes::Regex;

/// Buffer for accumulating console output and searching it for patterns.
#[derive(Debug)]
pub struct PatternBuffer {
    /// Unconsumed output, ANSI escapes removed.
    buffer: Vec<u8>,

    /// How many bytes from the end to search for prompt patterns.
    search_depth: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            search_depth,
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        let cleaned = strip_ansi_escapes::strip(data);
        self.buffer.extend_from_slice(&cleaned);
    }

    /// Search the tail of the buffer for a prompt pattern.
    ///
    /// Returns the end offset of the match within the full buffer.
    pub fn find_prompt(&self, pattern: &Regex) -> Option<usize> {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        pattern.find(&self.buffer[start..]).map(|m| start + m.end())
    }

    /// Search the whole buffer for a literal marker.
    ///
    /// Returns the end offset of the first occurrence.
    pub fn find_marker(&self, marker: &[u8]) -> Option<usize> {
        memmem::find(&self.buffer, marker).map(|pos| pos + marker.len())
    }

    /// Remove and return everything up to `end`, keeping the remainder.
    pub fn consume_through(&mut self, end: usize) -> Vec<u8> {
        let end = end.min(self.buffer.len());
        let rest = self.buffer.split_off(end);
        std::mem::replace(&mut self.buffer, rest)
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}
