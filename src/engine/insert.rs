//! Insertion: arbitrary text (paste, replay) and single typed characters.

use super::{ChunkEngine, EditOutcome};
use crate::chunk::{byte_index, Chunk, Side};
use crate::error::EditError;
use crate::undo::{EditDescriptor, EditKind, EditOp, History};

impl ChunkEngine {
    /// Insert `text` at `offset` as a paste
    pub fn insert_text(
        &mut self,
        text: &str,
        offset: usize,
        history: &mut dyn History,
    ) -> Result<EditOutcome, EditError> {
        self.insert_text_as(EditKind::Paste, text, offset, history)
    }

    /// Insert `text` at `offset`, labelling the descriptor with `kind`
    pub fn insert_text_as(
        &mut self,
        kind: EditKind,
        text: &str,
        offset: usize,
        history: &mut dyn History,
    ) -> Result<EditOutcome, EditError> {
        self.check_offset(offset)?;
        if text.is_empty() {
            return Ok(EditOutcome::default());
        }

        history.track(EditDescriptor::for_insert(
            kind,
            text,
            offset,
            self.snippet_length,
        ));
        self.apply_insert(text, offset)
    }

    pub(super) fn apply_insert(
        &mut self,
        text: &str,
        offset: usize,
    ) -> Result<EditOutcome, EditError> {
        let (index, char_in_chunk) = self.chunks.locate(offset)?;
        Ok(self.insert_at(text, offset, index, char_in_chunk))
    }

    /// Tokenize, split, shift, splice, coalesce. `index`/`char_in_chunk` must
    /// be where `offset` lands.
    pub(super) fn insert_at(
        &mut self,
        text: &str,
        offset: usize,
        index: usize,
        char_in_chunk: usize,
    ) -> EditOutcome {
        if text.is_empty() {
            return EditOutcome::default();
        }

        let inserted = self.matcher.insert_map(text, offset);
        let count = inserted.len();
        let len: usize = inserted.iter().map(Chunk::len_chars).sum();
        let mut view = Vec::with_capacity(count + 4);

        // Strictly inside a chunk: split it so the new runs go between the halves.
        let at = if char_in_chunk > 0 {
            let suffix = self.chunks.split_at(index, char_in_chunk);
            self.emit_set_text(&mut view, index);
            self.emit_insert(&mut view, suffix);
            suffix
        } else {
            index
        };

        self.chunks.shift_right(at, len);
        self.chunks.splice_in(at, inserted);
        for i in at..at + count {
            self.emit_insert(&mut view, i);
        }

        // Trailing boundary first so `at` stays valid for the leading one.
        self.coalesce(at + count - 1, &mut view);
        if at > 0 {
            self.coalesce(at - 1, &mut view);
        }

        self.check_invariants();
        tracing::debug!(
            target: "chunks",
            offset,
            len,
            runs = count,
            chunks = self.chunks.chunk_count(),
            "insert"
        );

        EditOutcome {
            view,
            applied: Some(EditOp::Insert {
                text: text.to_string(),
                offset,
            }),
            removed: String::new(),
        }
    }

    /// Type one character at `caret`.
    ///
    /// Extends the run before the caret if the tags agree, else prefixes the
    /// run after it, else opens a new single-character run (splitting the
    /// current run first when the caret is inside it).
    pub fn insert_char(
        &mut self,
        ch: char,
        caret: usize,
        history: &mut dyn History,
    ) -> Result<EditOutcome, EditError> {
        let before = self.chunks.boundary_context(caret, Side::Before)?;
        let after = self.chunks.position_after(caret)?;

        let mut buf = [0u8; 4];
        let typed: &str = ch.encode_utf8(&mut buf);
        history.track(EditDescriptor::for_insert(
            EditKind::Type,
            typed,
            caret,
            self.snippet_length,
        ));

        let tag = self.matcher.classify_char(ch);
        let mut view = Vec::with_capacity(3);

        match before.position() {
            Some(pos) if pos.tag == tag => {
                let index = pos.chunk_index;
                let chunk = self.chunks.chunk_mut(index);
                let at = byte_index(&chunk.text, pos.char_in_chunk);
                chunk.text.insert(at, ch);
                self.chunks.shift_right(index + 1, 1);
                self.emit_set_text(&mut view, index);
            }
            _ if after.tag == tag => {
                let index = after.chunk_index;
                self.chunks.chunk_mut(index).text.insert(0, ch);
                self.chunks.shift_right(index + 1, 1);
                self.emit_set_text(&mut view, index);
            }
            _ => {
                let at = if before.chunk_index() == Some(after.chunk_index) {
                    let index = after.chunk_index;
                    let suffix = self.chunks.split_at(index, after.char_in_chunk);
                    self.emit_set_text(&mut view, index);
                    self.emit_insert(&mut view, suffix);
                    suffix
                } else {
                    after.chunk_index
                };
                self.chunks.insert(at, Chunk::new(typed, tag, caret));
                self.chunks.shift_right(at + 1, 1);
                self.emit_insert(&mut view, at);
            }
        }

        self.check_invariants();
        tracing::debug!(target: "chunks", caret, ?tag, "type");

        Ok(EditOutcome {
            view,
            applied: Some(EditOp::Insert {
                text: typed.to_string(),
                offset: caret,
            }),
            removed: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::chunk::{Chunk, Tag};
    use crate::engine::ChunkEngine;
    use crate::pattern::PatternMatcher;
    use crate::undo::{EditDescriptor, EditOp, NoHistory};
    use crate::view::{SpanList, ViewOp};

    fn shape(engine: &ChunkEngine) -> Vec<(Tag, String, usize)> {
        engine
            .chunks()
            .iter()
            .map(|c| (c.tag(), c.text().to_string(), c.start()))
            .collect()
    }

    fn type_str(engine: &mut ChunkEngine, caret: usize, text: &str) -> usize {
        let mut caret = caret;
        for ch in text.chars() {
            engine.insert_char(ch, caret, &mut NoHistory).unwrap();
            caret += 1;
        }
        caret
    }

    #[test]
    fn test_typing_builds_one_word() {
        let mut engine = ChunkEngine::default();
        type_str(&mut engine, 0, "cat");
        assert_eq!(
            shape(&engine),
            vec![
                (Tag::Word, "cat".to_string(), 0),
                (Tag::Sentinel, String::new(), 3)
            ]
        );
    }

    #[test]
    fn test_typing_inside_word_with_other_tag_splits() {
        let mut engine = ChunkEngine::default();
        type_str(&mut engine, 0, "catdog");
        engine.insert_char(' ', 3, &mut NoHistory).unwrap();
        assert_eq!(
            shape(&engine),
            vec![
                (Tag::Word, "cat".to_string(), 0),
                (Tag::NonWord, " ".to_string(), 3),
                (Tag::Word, "dog".to_string(), 4),
                (Tag::Sentinel, String::new(), 7)
            ]
        );
    }

    #[test]
    fn test_typing_prefixes_following_run() {
        let mut engine = ChunkEngine::default();
        engine.load(" dog");
        engine.insert_char('x', 1, &mut NoHistory).unwrap();
        assert_eq!(engine.chunks().get(1).unwrap().text(), "xdog");
        assert_eq!(engine.chunks().get(1).unwrap().start(), 1);
    }

    #[test]
    fn test_typing_at_start_prefixes_first_run() {
        let mut engine = ChunkEngine::default();
        engine.load("dog");
        engine.insert_char('x', 0, &mut NoHistory).unwrap();
        assert_eq!(engine.chunks().chunk_count(), 2);
        assert_eq!(engine.text(), "xdog");
    }

    #[test]
    fn test_typing_space_at_start_opens_new_run() {
        let mut engine = ChunkEngine::default();
        engine.load("dog");
        engine.insert_char(' ', 0, &mut NoHistory).unwrap();
        assert_eq!(
            shape(&engine),
            vec![
                (Tag::NonWord, " ".to_string(), 0),
                (Tag::Word, "dog".to_string(), 1),
                (Tag::Sentinel, String::new(), 4)
            ]
        );
    }

    #[test]
    fn test_typing_emits_descriptor() {
        let mut engine = ChunkEngine::default();
        let mut history: Vec<EditDescriptor> = Vec::new();
        engine.insert_char('a', 0, &mut history).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].inverse, EditOp::Delete { start: 0, end: 1 });
    }

    #[test]
    fn test_typing_out_of_range_is_rejected_without_descriptor() {
        let mut engine = ChunkEngine::default();
        let mut history: Vec<EditDescriptor> = Vec::new();
        assert!(engine.insert_char('a', 1, &mut history).is_err());
        assert!(history.is_empty());
        assert!(engine.chunks().is_blank());
    }

    #[test]
    fn test_paste_with_separator_pattern() {
        let mut engine = ChunkEngine::new(PatternMatcher::new("XY", false).unwrap());
        engine.insert_text("abXYcd", 0, &mut NoHistory).unwrap();
        assert_eq!(
            shape(&engine),
            vec![
                (Tag::Word, "ab".to_string(), 0),
                (Tag::NonWord, "XY".to_string(), 2),
                (Tag::Word, "cd".to_string(), 4),
                (Tag::Sentinel, String::new(), 6)
            ]
        );
    }

    #[test]
    fn test_paste_inside_word_merges_both_sides() {
        let mut engine = ChunkEngine::default();
        engine.load("catdog");
        engine.insert_text("fish", 3, &mut NoHistory).unwrap();
        assert_eq!(
            shape(&engine),
            vec![
                (Tag::Word, "catfishdog".to_string(), 0),
                (Tag::Sentinel, String::new(), 10)
            ]
        );
    }

    #[test]
    fn test_paste_mixed_inside_word() {
        let mut engine = ChunkEngine::default();
        engine.load("catdog");
        engine.insert_text("s, hot", 3, &mut NoHistory).unwrap();
        assert_eq!(
            shape(&engine),
            vec![
                (Tag::Word, "cats".to_string(), 0),
                (Tag::NonWord, ", ".to_string(), 4),
                (Tag::Word, "hotdog".to_string(), 6),
                (Tag::Sentinel, String::new(), 12)
            ]
        );
    }

    #[test]
    fn test_paste_at_boundary_merges_with_neighbours() {
        let mut engine = ChunkEngine::default();
        engine.load("cat dog");
        engine.insert_text("  ", 3, &mut NoHistory).unwrap();
        assert_eq!(engine.chunks().get(1).unwrap().text(), "   ");
        assert_eq!(engine.chunks().chunk_count(), 4);
        assert_eq!(engine.chunks().get(2).unwrap().start(), 6);
    }

    #[test]
    fn test_paste_empty_is_noop() {
        let mut engine = ChunkEngine::default();
        let mut history: Vec<EditDescriptor> = Vec::new();
        let outcome = engine.insert_text("", 0, &mut history).unwrap();
        assert!(outcome.is_noop());
        assert!(outcome.view.is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn test_paste_out_of_range() {
        let mut engine = ChunkEngine::default();
        engine.load("cat");
        assert!(engine.insert_text("x", 4, &mut NoHistory).is_err());
        assert_eq!(engine.text(), "cat");
    }

    #[test]
    fn test_insert_view_ops_mirror_chunks() {
        let mut engine = ChunkEngine::default();
        let mut spans = SpanList::new();
        spans.apply(&engine.load("cat dog").view);
        spans.apply(&engine.insert_text("s, big", 3, &mut NoHistory).unwrap().view);
        spans.apply(&engine.insert_char('!', 0, &mut NoHistory).unwrap().view);
        spans.apply(&engine.insert_char('x', 5, &mut NoHistory).unwrap().view);

        let texts: Vec<&str> = spans.spans().iter().map(|s| s.text.as_str()).collect();
        let chunks: Vec<&str> = engine.chunks().iter().map(Chunk::text).collect();
        assert_eq!(texts, chunks);
    }

    #[test]
    fn test_typing_extend_emits_single_set_text() {
        let mut engine = ChunkEngine::default();
        engine.load("ca");
        let outcome = engine.insert_char('t', 2, &mut NoHistory).unwrap();
        assert_eq!(
            outcome.view,
            vec![ViewOp::SetRunText {
                index: 0,
                text: "cat".to_string(),
                style: None
            }]
        );
    }
}
