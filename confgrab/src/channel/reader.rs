//! Read-until-prompt loop shared by every transport.

use std::future::Future;
use std::time::Duration;

use log::trace;
use regex::bytes::Regex;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// A source of raw session output.
///
/// Implementations return whatever the peer has sent next (at least one
/// byte, possibly empty after protocol bytes were consumed), or
/// `ChannelError::Closed` once the peer has gone away.
pub trait ChunkSource: Send {
    fn read_chunk(&mut self) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Result of a successful read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    /// Everything the device sent before the pattern matched.
    pub data: Vec<u8>,

    /// The text the pattern matched (typically the prompt).
    pub matched: Vec<u8>,
}

impl ReadResult {
    /// Get the matched text as a string (lossy UTF-8).
    pub fn matched_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.matched)
    }
}

/// Accumulates output from a [`ChunkSource`] until a prompt appears.
///
/// Output arriving across any number of partial reads is joined before the
/// pattern is tried, so a prompt split over two TCP segments is still found.
pub struct PromptReader<S> {
    source: S,
    buffer: PatternBuffer,
}

impl<S: ChunkSource> PromptReader<S> {
    /// Create a reader with the given tail search depth.
    pub fn new(source: S, search_depth: usize) -> Self {
        Self {
            source,
            buffer: PatternBuffer::new(search_depth),
        }
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Read until `pattern` matches the tail of the accumulated output.
    ///
    /// `timeout` bounds the whole call, not each individual read.
    pub async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<ReadResult> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if let Some((data, matched)) = self.buffer.take_through(pattern) {
                return Ok(ReadResult { data, matched });
            }

            let chunk = tokio::time::timeout_at(deadline, self.source.read_chunk())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))??;

            trace!("read chunk: {} bytes", chunk.len());
            self.buffer.extend(&chunk);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::error::Error;

    struct Chunks(VecDeque<Vec<u8>>);

    impl ChunkSource for Chunks {
        async fn read_chunk(&mut self) -> Result<Vec<u8>> {
            match self.0.pop_front() {
                Some(chunk) => Ok(chunk),
                None => std::future::pending().await,
            }
        }
    }

    fn reader(chunks: &[&[u8]]) -> PromptReader<Chunks> {
        let chunks = chunks.iter().map(|c| c.to_vec()).collect();
        PromptReader::new(Chunks(chunks), 1000)
    }

    #[tokio::test]
    async fn test_prompt_split_across_reads() {
        let mut reader = reader(&[b"hostname r1\nrou", b"ter", b"#"]);
        let pattern = Regex::new(r"(?m)^router#\s*$").unwrap();

        let result = reader
            .read_until(&pattern, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(result.data, b"hostname r1\n");
        assert_eq!(result.matched_str(), "router#");
    }

    #[tokio::test]
    async fn test_remainder_kept_for_next_read() {
        let mut reader = reader(&[b"Username: ", b"admin\r\nPassword: "]);
        let user = Regex::new(r"Username:\s*$").unwrap();
        let pass = Regex::new(r"Password:\s*$").unwrap();

        let first = reader.read_until(&user, Duration::from_secs(1)).await.unwrap();
        assert!(first.data.is_empty());

        let second = reader.read_until(&pass, Duration::from_secs(1)).await.unwrap();
        assert_eq!(second.data, b"admin\r\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_when_prompt_never_arrives() {
        let mut reader = reader(&[b"banner text\n"]);
        let pattern = Regex::new(r"router#\s*$").unwrap();

        let err = reader
            .read_until(&pattern, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Channel(ChannelError::PatternTimeout(d)) if d == Duration::from_secs(5)
        ));
    }
}
