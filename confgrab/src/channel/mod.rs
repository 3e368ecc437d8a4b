//! Channel layer for pattern matching over raw session output.
//!
//! This module turns a stream of arbitrarily split reads into
//! "everything up to the next prompt", with ANSI stripping.

mod buffer;
mod patterns;
mod reader;

pub use buffer::PatternBuffer;
pub use patterns::{compile_prompt_pattern, normalize_newlines, strip_echo};
pub use reader::{ChunkSource, PromptReader, ReadResult};
