//! Host text buffers the chunk engine is kept in step with.
//!
//! `TextBuffer` is the read side, `TextBufferMut` adds the two primitive
//! mutations. Offsets are character offsets throughout. `StringBuffer` suits
//! short inputs, `RopeBuffer` whole documents.

use ropey::Rope;
use std::ops::Range;

use crate::chunk::byte_index;

/// Read-only view into a text buffer
pub trait TextBuffer {
    /// Total length in characters
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Text in a character range, clamped to the buffer
    fn slice(&self, range: Range<usize>) -> String;

    /// Full content (may be expensive for large buffers)
    fn content(&self) -> String;

    /// Number of lines (always >= 1)
    fn line_count(&self) -> usize;

    /// Convert a char offset to (line, column), both zero-based
    fn offset_to_position(&self, offset: usize) -> (usize, usize);
}

/// Mutable buffer operations
pub trait TextBufferMut: TextBuffer {
    /// Insert text at character offset
    fn insert(&mut self, offset: usize, text: &str);

    /// Remove text in character range
    fn remove(&mut self, range: Range<usize>);

    fn clear(&mut self) {
        let len = self.len_chars();
        if len > 0 {
            self.remove(0..len);
        }
    }

    /// Set content, replacing everything
    fn set_content(&mut self, text: &str) {
        self.clear();
        self.insert(0, text);
    }
}

// =============================================================================
// StringBuffer
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringBuffer {
    text: String,
}

impl StringBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            text: s.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl TextBuffer for StringBuffer {
    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    fn slice(&self, range: Range<usize>) -> String {
        let len = self.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.text.chars().skip(start).take(end - start).collect()
    }

    fn content(&self) -> String {
        self.text.clone()
    }

    fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;
        for ch in self.text.chars().take(offset) {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl TextBufferMut for StringBuffer {
    fn insert(&mut self, offset: usize, text: &str) {
        let at = byte_index(&self.text, offset);
        self.text.insert_str(at, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        let start = byte_index(&self.text, range.start);
        let end = byte_index(&self.text, range.end);
        self.text.replace_range(start..end, "");
    }
}

// =============================================================================
// RopeBuffer
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct RopeBuffer {
    rope: Rope,
}

impl RopeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }
}

impl TextBuffer for RopeBuffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn slice(&self, range: Range<usize>) -> String {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.rope.slice(start..end).to_string()
    }

    fn content(&self) -> String {
        self.rope.to_string()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }
}

impl TextBufferMut for RopeBuffer {
    fn insert(&mut self, offset: usize, text: &str) {
        let offset = offset.min(self.rope.len_chars());
        self.rope.insert(offset, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.rope.remove(start..end);
    }
}
