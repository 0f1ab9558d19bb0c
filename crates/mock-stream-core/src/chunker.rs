// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Splitting finished text into streaming deltas
//!
//! Text is first tokenised into alternating runs of whitespace and
//! non-whitespace, so whitespace is never lost during tokenisation. The two
//! modes differ only in how tokens are grouped:
//!
//! - [`ChunkMode::BoundedWords`] packs tokens into chunks of at most `max_len`
//!   characters. A token is never split, so a single oversized word becomes
//!   its own chunk. A whitespace token that would overflow the buffer starts
//!   the next chunk. Chunks that contain only whitespace are dropped.
//! - [`ChunkMode::Whitespace`] emits every token as its own chunk and is
//!   exactly lossless.

/// Default bound for [`ChunkMode::BoundedWords`]
pub const DEFAULT_CHUNK_MAX_LEN: usize = 60;

/// Chunk grouping policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkMode {
    BoundedWords { max_len: usize },
    Whitespace,
}

impl Default for ChunkMode {
    fn default() -> Self {
        ChunkMode::BoundedWords {
            max_len: DEFAULT_CHUNK_MAX_LEN,
        }
    }
}

/// Split `text` into ordered, non-empty chunks according to `mode`
pub fn chunk(text: &str, mode: ChunkMode) -> Vec<String> {
    match mode {
        ChunkMode::Whitespace => tokens(text).map(str::to_string).collect(),
        ChunkMode::BoundedWords { max_len } => bounded(text, max_len)
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .collect(),
    }
}

/// Bounded grouping before whitespace-only chunks are filtered
fn bounded(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;

    for token in tokens(text) {
        let token_len = token.chars().count();
        if !buffer.is_empty() && buffer_len + token_len > max_len {
            chunks.push(std::mem::take(&mut buffer));
            buffer_len = 0;
        }
        buffer.push_str(token);
        buffer_len += token_len;
    }

    if !buffer.is_empty() {
        chunks.push(buffer);
    }
    chunks
}

/// Iterate maximal runs of whitespace / non-whitespace characters
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let in_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != in_space)
            .map(|(index, _)| index)
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        rest = tail;
        Some(token)
    })
}
