//! Offset resolution: absolute char offset -> (chunk, char within chunk).

use super::{ChunkSequence, Tag};
use crate::error::EditError;

/// Which neighbour a boundary offset resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A boundary hit resolves to the chunk that ends at the offset
    Before,
    /// A boundary hit resolves to the chunk that starts at the offset
    After,
}

/// Resolved position inside a concrete chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPosition {
    pub offset: usize,
    pub chunk_index: usize,
    pub char_in_chunk: usize,
    pub tag: Tag,
}

/// Insertion/deletion context for one side of an offset.
///
/// Built per operation and never kept between operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryContext {
    /// `Side::Before` at offset 0: there is no preceding chunk
    StartOfBuffer,
    Chunk(ChunkPosition),
}

impl BoundaryContext {
    /// Tag of the resolved chunk, `None` at the start of the buffer
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Self::StartOfBuffer => None,
            Self::Chunk(pos) => Some(pos.tag),
        }
    }

    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            Self::StartOfBuffer => None,
            Self::Chunk(pos) => Some(pos.chunk_index),
        }
    }

    pub fn char_in_chunk(&self) -> usize {
        match self {
            Self::StartOfBuffer => 0,
            Self::Chunk(pos) => pos.char_in_chunk,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Self::StartOfBuffer => 0,
            Self::Chunk(pos) => pos.offset,
        }
    }

    pub fn position(&self) -> Option<&ChunkPosition> {
        match self {
            Self::StartOfBuffer => None,
            Self::Chunk(pos) => Some(pos),
        }
    }
}

impl ChunkSequence {
    /// Find the chunk whose start is the greatest value `<= offset`.
    ///
    /// Returns `(chunk_index, char_in_chunk)`. At `offset == len_chars()` this
    /// is the sentinel with `char_in_chunk == 0`.
    pub fn locate(&self, offset: usize) -> Result<(usize, usize), EditError> {
        let len = self.len_chars();
        if offset > len {
            return Err(EditError::out_of_range(offset, len));
        }

        // chunks[0].start == 0, so at least one chunk satisfies the predicate.
        let index = self.chunks.partition_point(|c| c.start <= offset) - 1;
        Ok((index, offset - self.chunks[index].start))
    }

    /// Resolve `offset` to the chunk on the requested side of it.
    pub fn boundary_context(
        &self,
        offset: usize,
        side: Side,
    ) -> Result<BoundaryContext, EditError> {
        match side {
            Side::Before => self.position_before(offset),
            Side::After => self.position_after(offset).map(BoundaryContext::Chunk),
        }
    }

    /// `Side::Before` resolution: a boundary hit reports the previous chunk
    /// with `char_in_chunk` equal to its length.
    fn position_before(&self, offset: usize) -> Result<BoundaryContext, EditError> {
        if offset == 0 {
            return Ok(BoundaryContext::StartOfBuffer);
        }

        let (mut index, mut char_in_chunk) = self.locate(offset)?;
        if char_in_chunk == 0 {
            index -= 1;
            char_in_chunk = self.chunks[index].len_chars();
        }
        Ok(BoundaryContext::Chunk(self.position(offset, index, char_in_chunk)))
    }

    /// `Side::After` resolution: a boundary hit reports the chunk starting at
    /// `offset`. Never the start-of-buffer context.
    pub fn position_after(&self, offset: usize) -> Result<ChunkPosition, EditError> {
        let (index, char_in_chunk) = self.locate(offset)?;
        Ok(self.position(offset, index, char_in_chunk))
    }

    fn position(&self, offset: usize, index: usize, char_in_chunk: usize) -> ChunkPosition {
        ChunkPosition {
            offset,
            chunk_index: index,
            char_in_chunk,
            tag: self.chunks[index].tag,
        }
    }
}
