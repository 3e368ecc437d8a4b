//! Pattern buffer with tail-only prompt search.
//!
//! Device output is accumulated here between prompts. Prompts are matched
//! against a copy of the output with terminal escape sequences removed,
//! while the bytes handed back to the caller are exactly what the device
//! sent. Only the last `search_depth` bytes are searched for the prompt, so
//! a multi-megabyte running configuration does not turn every read into a
//! full rescan.

use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Buffer for accumulating device output and locating the next prompt.
pub struct PatternBuffer {
    /// Bytes as received.
    raw: Vec<u8>,

    /// Escape-free view of `raw` that prompts are matched against.
    text: Vec<u8>,

    /// For each byte of `text`, the length of `raw` once it was produced.
    ends: Vec<usize>,

    /// Escape sequence state, kept across reads.
    parser: Parser,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,
}

/// Collects printable output and line control characters from the parser.
struct TextSink<'a> {
    text: &'a mut Vec<u8>,
    ends: &'a mut Vec<usize>,
    raw_end: usize,
}

impl TextSink<'_> {
    fn push(&mut self, bytes: &[u8]) {
        self.text.extend_from_slice(bytes);
        self.ends
            .extend(std::iter::repeat_n(self.raw_end, bytes.len()));
    }
}

impl Perform for TextSink<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.push(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\t' | b'\r' | b'\n') {
            self.push(&[byte]);
        }
    }
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    ///
    /// # Arguments
    ///
    /// * `search_depth` - Number of bytes from the end to search for patterns.
    ///   A prompt never spans more than a line, 1000 bytes is plenty.
    pub fn new(search_depth: usize) -> Self {
        Self {
            raw: Vec::with_capacity(4096),
            text: Vec::with_capacity(4096),
            ends: Vec::with_capacity(4096),
            parser: Parser::new(),
            search_depth,
        }
    }

    /// Append received bytes.
    ///
    /// An escape sequence or UTF-8 character split across two reads is
    /// handled, the parser state carries over.
    pub fn extend(&mut self, data: &[u8]) {
        for &byte in data {
            self.raw.push(byte);
            let mut sink = TextSink {
                text: &mut self.text,
                ends: &mut self.ends,
                raw_end: self.raw.len(),
            };
            self.parser.advance(&mut sink, &[byte]);
        }
    }

    /// If the tail matches `pattern`, remove everything up to the end of the
    /// match and return `(output, matched)`.
    ///
    /// `output` is the raw bytes that preceded the prompt; `matched` is the
    /// prompt text without escape sequences. Bytes after the match stay
    /// buffered for the next read.
    pub fn take_through(&mut self, pattern: &Regex) -> Option<(Vec<u8>, Vec<u8>)> {
        let offset = self.tail_start();
        let m = pattern.find(&self.text[offset..])?;
        let (start, end) = (offset + m.start(), offset + m.end());

        let raw_start = match start {
            0 => 0,
            s => self.ends[s - 1],
        };
        let raw_end = match end {
            e if e > start => self.ends[e - 1],
            _ => raw_start,
        };

        let matched = self.text[start..end].to_vec();
        self.text.drain(..end);
        self.ends.drain(..end);
        for pos in &mut self.ends {
            *pos -= raw_end;
        }

        let mut output: Vec<u8> = self.raw.drain(..raw_end).collect();
        output.truncate(raw_start);
        Some((output, matched))
    }

    fn tail_start(&self) -> usize {
        let start = self.text.len().saturating_sub(self.search_depth);
        // Never start the search mid-line: a `^`-anchored prompt would
        // otherwise match on a truncated line.
        match memchr::memrchr(b'\n', &self.text[..start]) {
            Some(nl) if start > 0 => nl + 1,
            _ => 0,
        }
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl std::fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("buffered", &self.raw.len())
            .field("search_depth", &self.search_depth)
            .finish()
    }
}
