//! Chunk model: the classified, gap-free decomposition of the text buffer.
//!
//! A [`ChunkSequence`] covers the buffer with [`Chunk`]s in order. Each chunk
//! carries its text, its [`Tag`] and its absolute start offset (in chars).
//! The sequence always ends with a zero-length [`Tag::Sentinel`] chunk whose
//! start equals the buffer length.
//!
//! # Invariants
//!
//! - `chunks[0].start == 0`
//! - `chunks[i + 1].start == chunks[i].start + chunks[i].len_chars()`
//! - only the last chunk is a sentinel, and only the sentinel is empty
//! - no two adjacent non-sentinel chunks share a tag
//!
//! Mutation primitives are crate-private; only the edit engine drives them.

mod resolver;

pub use resolver::{BoundaryContext, ChunkPosition, Side};

use serde::Serialize;
use std::ops::Range;

/// Classification of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Text matched by the active word pattern
    Word,
    /// Everything else, including line breaks
    NonWord,
    /// Synthetic end marker: never merged, never removed, always last
    Sentinel,
}

impl Tag {
    /// The opposite classification (Word <-> NonWord)
    pub fn flip(self) -> Self {
        match self {
            Tag::Word => Tag::NonWord,
            Tag::NonWord => Tag::Word,
            Tag::Sentinel => Tag::Sentinel,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tag::Word => "word",
            Tag::NonWord => "non-word",
            Tag::Sentinel => "end",
        }
    }
}

/// A maximal contiguous run of buffer text sharing one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub(crate) text: String,
    pub(crate) tag: Tag,
    pub(crate) start: usize,
}

impl Chunk {
    pub fn new(text: impl Into<String>, tag: Tag, start: usize) -> Self {
        Self {
            text: text.into(),
            tag,
            start,
        }
    }

    pub fn sentinel(start: usize) -> Self {
        Self::new(String::new(), Tag::Sentinel, start)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Absolute char offset of the first character
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length in characters
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Absolute char offset one past the last character
    pub fn end(&self) -> usize {
        self.start + self.len_chars()
    }

    pub fn is_sentinel(&self) -> bool {
        self.tag == Tag::Sentinel
    }

    /// Half-open char range covered by this chunk
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Convert a char index within `text` to a byte index
pub(crate) fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Description of a broken chunk-sequence invariant.
///
/// Seeing one of these means the sequence is corrupt; the engine treats it as
/// fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub chunk_index: usize,
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chunk #{}: {}", self.chunk_index, self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Ordered, index-addressable, sentinel-terminated list of chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSequence {
    chunks: Vec<Chunk>,
}

impl Default for ChunkSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkSequence {
    /// The empty buffer: `[Sentinel@0]`
    pub fn new() -> Self {
        Self {
            chunks: vec![Chunk::sentinel(0)],
        }
    }

    /// Number of chunks, sentinel included (always >= 1)
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total buffer length in characters (the sentinel's start)
    pub fn len_chars(&self) -> usize {
        self.sentinel().start
    }

    pub fn is_blank(&self) -> bool {
        self.chunks.len() == 1
    }

    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    pub fn as_slice(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn sentinel(&self) -> &Chunk {
        // The constructor and every primitive keep the sentinel in place.
        &self.chunks[self.chunks.len() - 1]
    }

    /// Rebuild the buffer text from the chunks
    pub fn text(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Text covering the char range `range` (clamped to the buffer)
    pub fn slice(&self, range: Range<usize>) -> String {
        let mut out = String::new();
        for chunk in &self.chunks {
            let chunk_range = chunk.range();
            if chunk_range.end <= range.start || chunk.is_sentinel() {
                continue;
            }
            if chunk_range.start >= range.end {
                break;
            }
            let from = range.start.saturating_sub(chunk_range.start);
            let to = range.end.min(chunk_range.end) - chunk_range.start;
            let text = &chunk.text;
            out.push_str(&text[byte_index(text, from)..byte_index(text, to)]);
        }
        out
    }

    /// Index of the first chunk starting at or after `offset`
    pub(crate) fn first_starting_at(&self, offset: usize) -> usize {
        self.chunks.partition_point(|c| c.start < offset)
    }

    /// Check every structural invariant.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let fail = |chunk_index: usize, message: String| {
            Err(InvariantViolation {
                chunk_index,
                message,
            })
        };

        let last = self.chunks.len() - 1;
        let mut expected_start = 0;
        let mut previous_tag: Option<Tag> = None;

        for (i, chunk) in self.chunks.iter().enumerate() {
            if chunk.start != expected_start {
                return fail(
                    i,
                    format!("starts at {} but should start at {}", chunk.start, expected_start),
                );
            }
            if chunk.is_sentinel() != (i == last) {
                return fail(i, "sentinel must be exactly the last chunk".to_string());
            }
            if i != last {
                if chunk.text.is_empty() {
                    return fail(i, "non-sentinel chunk is empty".to_string());
                }
                if previous_tag == Some(chunk.tag) {
                    return fail(i, format!("shares tag {:?} with its predecessor", chunk.tag));
                }
            } else if !chunk.text.is_empty() {
                return fail(i, "sentinel carries text".to_string());
            }
            previous_tag = Some(chunk.tag);
            expected_start += chunk.len_chars();
        }

        Ok(())
    }

    // =========================================================================
    // Mutation primitives (edit engine only)
    // =========================================================================

    pub(crate) fn reset(&mut self) {
        self.chunks.clear();
        self.chunks.push(Chunk::sentinel(0));
    }

    pub(crate) fn chunk_mut(&mut self, index: usize) -> &mut Chunk {
        &mut self.chunks[index]
    }

    /// Add `amount` to the start of every chunk from `from` onwards
    pub(crate) fn shift_right(&mut self, from: usize, amount: usize) {
        for chunk in self.chunks.iter_mut().skip(from) {
            chunk.start += amount;
        }
    }

    /// Subtract `amount` from the start of every chunk from `from` onwards
    pub(crate) fn shift_left(&mut self, from: usize, amount: usize) {
        for chunk in self.chunks.iter_mut().skip(from) {
            chunk.start -= amount;
        }
    }

    /// Split chunk `index` at `char_in_chunk`, keeping the prefix in place and
    /// inserting the suffix (same tag) right after it. Returns the suffix index.
    pub(crate) fn split_at(&mut self, index: usize, char_in_chunk: usize) -> usize {
        let chunk = &mut self.chunks[index];
        let at = byte_index(&chunk.text, char_in_chunk);
        let suffix = chunk.text.split_off(at);
        let split = Chunk::new(suffix, chunk.tag, chunk.start + char_in_chunk);
        tracing::trace!(target: "chunks", index, char_in_chunk, "split");
        self.chunks.insert(index + 1, split);
        index + 1
    }

    pub(crate) fn insert(&mut self, index: usize, chunk: Chunk) {
        self.chunks.insert(index, chunk);
    }

    pub(crate) fn splice_in(&mut self, index: usize, chunks: Vec<Chunk>) {
        self.chunks.splice(index..index, chunks);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Chunk {
        self.chunks.remove(index)
    }

    /// Append chunk `index + 1`'s text to chunk `index` and drop the former
    pub(crate) fn merge_with_next(&mut self, index: usize) {
        let next = self.chunks.remove(index + 1);
        self.chunks[index].text.push_str(&next.text);
        tracing::trace!(target: "chunks", index, "merge");
    }
}

impl<'a> IntoIterator for &'a ChunkSequence {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}
