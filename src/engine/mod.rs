//! Edit engine: keeps the [`ChunkSequence`] in step with the text buffer.
//!
//! Insert and Delete are built from the same few steps: resolve the boundary
//! contexts, split if needed, splice content in or out, shift the trailing
//! offsets, then coalesce neighbours that ended up with the same tag.
//!
//! Each public mutation validates its arguments before touching anything, so
//! an `Err` always means nothing changed. Caller-visible mutations emit one
//! [`EditDescriptor`] to the supplied [`History`]; [`ChunkEngine::replay`]
//! applies an [`EditOp`] without emitting.

mod delete;
mod insert;

use crate::chunk::{Chunk, ChunkSequence, Side, Tag};
use crate::config::ChunkerConfig;
use crate::error::EditError;
use crate::pattern::PatternMatcher;
use crate::undo::{EditOp, DEFAULT_SNIPPET_LENGTH};
use crate::view::{style_of, StyleHandle, Unstyled, ViewOp, WordClassifier};

/// What a mutation did, for the caller to mirror
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Renderer updates, in application order
    pub view: Vec<ViewOp>,
    /// The buffer change actually applied (`None` for a no-op)
    pub applied: Option<EditOp>,
    /// Text removed by a delete
    pub removed: String,
}

impl EditOutcome {
    pub fn is_noop(&self) -> bool {
        self.applied.is_none()
    }
}

/// Owner of the chunk sequence and the word pattern
pub struct ChunkEngine {
    chunks: ChunkSequence,
    matcher: PatternMatcher,
    classifier: Box<dyn WordClassifier>,
    snippet_length: usize,
}

impl Default for ChunkEngine {
    fn default() -> Self {
        Self::new(PatternMatcher::default())
    }
}

impl std::fmt::Debug for ChunkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkEngine")
            .field("chunks", &self.chunks)
            .field("pattern", &self.matcher.pattern())
            .field("words_are_positive", &self.matcher.words_are_positive())
            .finish()
    }
}

impl ChunkEngine {
    pub fn new(matcher: PatternMatcher) -> Self {
        Self {
            chunks: ChunkSequence::new(),
            matcher,
            classifier: Box::new(Unstyled),
            snippet_length: DEFAULT_SNIPPET_LENGTH,
        }
    }

    /// Engine set up from a config: pattern, polarity, word styles, label bound
    pub fn from_config(config: &ChunkerConfig) -> Result<Self, EditError> {
        let matcher = PatternMatcher::new(&config.pattern, config.words_are_positive)?;
        let mut engine = Self::new(matcher);
        engine.classifier = Box::new(config.word_styles());
        engine.snippet_length = config.snippet_length;
        Ok(engine)
    }

    pub fn with_classifier(mut self, classifier: Box<dyn WordClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn chunks(&self) -> &ChunkSequence {
        &self.chunks
    }

    pub fn len_chars(&self) -> usize {
        self.chunks.len_chars()
    }

    pub fn text(&self) -> String {
        self.chunks.text()
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    pub fn snippet_length(&self) -> usize {
        self.snippet_length
    }

    pub fn set_snippet_length(&mut self, snippet_length: usize) {
        self.snippet_length = snippet_length;
    }

    /// Style the renderer should use for chunk `index`
    pub fn style_at(&self, index: usize) -> Option<StyleHandle> {
        self.chunks
            .get(index)
            .and_then(|chunk| style_of(self.classifier.as_ref(), chunk))
    }

    /// Index of the Word chunk ending at or containing the caret, if any.
    /// A caret past the end has no word before it.
    pub fn word_before(&self, caret: usize) -> Option<usize> {
        let ctx = self.chunks.boundary_context(caret, Side::Before).ok()?;
        match ctx.position() {
            Some(pos) if pos.tag == Tag::Word => Some(pos.chunk_index),
            _ => None,
        }
    }

    // =========================================================================
    // Whole-buffer replacement and pattern configuration
    // =========================================================================

    /// Replace everything with `text`. Not undoable.
    pub fn load(&mut self, text: &str) -> EditOutcome {
        let mut view = Vec::with_capacity(self.chunks.chunk_count());
        for _ in 1..self.chunks.chunk_count() {
            view.push(ViewOp::RemoveRun { index: 0 });
        }
        self.chunks.reset();

        // The sentinel is now the only chunk, so offset 0 sits at its start.
        let mut outcome = self.insert_at(text, 0, 0, 0);
        view.append(&mut outcome.view);
        outcome.view = view;

        tracing::debug!(
            target: "chunks",
            len = self.len_chars(),
            chunks = self.chunks.chunk_count(),
            "load"
        );
        outcome
    }

    /// Switch the word pattern. Existing chunks keep their boundaries and
    /// tags; Word chunks are restyled.
    pub fn set_pattern(
        &mut self,
        pattern: &str,
        words_are_positive: bool,
    ) -> Result<Vec<ViewOp>, EditError> {
        let matcher = PatternMatcher::new(pattern, words_are_positive)?;
        Ok(self.set_matcher(matcher))
    }

    pub fn set_matcher(&mut self, matcher: PatternMatcher) -> Vec<ViewOp> {
        tracing::debug!(
            target: "chunks",
            pattern = matcher.pattern(),
            words_are_positive = matcher.words_are_positive(),
            "set pattern"
        );
        self.matcher = matcher;
        self.restyle_words()
    }

    /// Swap the word classifier and restyle every Word chunk
    pub fn set_classifier(&mut self, classifier: Box<dyn WordClassifier>) -> Vec<ViewOp> {
        self.classifier = classifier;
        self.restyle_words()
    }

    /// Ops that build the current sequence in a fresh [`SpanList`](crate::view::SpanList)
    pub fn view_snapshot(&self) -> Vec<ViewOp> {
        let mut view = Vec::with_capacity(self.chunks.chunk_count());
        for index in 0..self.chunks.chunk_count() - 1 {
            self.emit_insert(&mut view, index);
        }
        view
    }

    /// `SetRunStyle` for every Word chunk
    pub fn restyle_words(&self) -> Vec<ViewOp> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| chunk.tag() == Tag::Word)
            .map(|(index, chunk)| ViewOp::SetRunStyle {
                index,
                style: style_of(self.classifier.as_ref(), chunk),
            })
            .collect()
    }

    // =========================================================================
    // Replay
    // =========================================================================

    /// Apply a recorded operation without emitting a descriptor
    pub fn replay(&mut self, op: &EditOp) -> Result<EditOutcome, EditError> {
        tracing::debug!(target: "chunks", op = op.name(), "replay");
        match op {
            EditOp::Insert { text, offset } => self.apply_insert(text, *offset),
            EditOp::Delete { start, end } => self.apply_delete(*start, *end),
        }
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    fn check_offset(&self, offset: usize) -> Result<(), EditError> {
        let len = self.len_chars();
        if offset > len {
            return Err(EditError::out_of_range(offset, len));
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), EditError> {
        if start > end {
            return Err(EditError::InvalidRange { start, end });
        }
        self.check_offset(end)
    }

    /// Two neighbouring chunks that must become one
    fn mergeable(&self, left: usize, right: usize) -> bool {
        match (self.chunks.get(left), self.chunks.get(right)) {
            (Some(a), Some(b)) => !a.is_sentinel() && !b.is_sentinel() && a.tag == b.tag,
            _ => false,
        }
    }

    /// Merge chunk `index` with its successor if they share a tag
    fn coalesce(&mut self, index: usize, view: &mut Vec<ViewOp>) -> bool {
        if !self.mergeable(index, index + 1) {
            return false;
        }
        self.chunks.merge_with_next(index);
        self.emit_set_text(view, index);
        view.push(ViewOp::RemoveRun { index: index + 1 });
        true
    }

    fn emit_set_text(&self, view: &mut Vec<ViewOp>, index: usize) {
        let chunk = &self.chunks.as_slice()[index];
        view.push(ViewOp::SetRunText {
            index,
            text: chunk.text.clone(),
            style: style_of(self.classifier.as_ref(), chunk),
        });
    }

    fn emit_insert(&self, view: &mut Vec<ViewOp>, index: usize) {
        let chunk: &Chunk = &self.chunks.as_slice()[index];
        view.push(ViewOp::InsertRunBefore {
            index,
            text: chunk.text.clone(),
            tag: chunk.tag,
            style: style_of(self.classifier.as_ref(), chunk),
        });
    }

    fn emit_remove(&mut self, view: &mut Vec<ViewOp>, index: usize) {
        self.chunks.remove(index);
        view.push(ViewOp::RemoveRun { index });
    }

    /// Corruption here cannot be recovered from: stop in debug builds.
    fn check_invariants(&self) {
        if cfg!(debug_assertions) {
            if let Err(violation) = self.chunks.verify() {
                panic!("chunk sequence corrupted: {}", violation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::undo::EditDescriptor;
    use crate::view::{SpanList, WordStyles};

    #[test]
    fn test_load_replaces_everything() {
        let mut engine = ChunkEngine::default();
        engine.load("cat dog");
        let outcome = engine.load("hi");
        assert_eq!(engine.text(), "hi");
        assert_eq!(engine.chunks().chunk_count(), 2);
        // three old runs removed, one inserted
        assert_eq!(
            outcome
                .view
                .iter()
                .filter(|op| matches!(op, ViewOp::RemoveRun { .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_load_view_ops_rebuild_spans() {
        let mut engine = ChunkEngine::default();
        let mut spans = SpanList::new();
        spans.apply(&engine.load("one, two").view);
        spans.apply(&engine.load("three four").view);
        assert_eq!(spans.text(), "three four");
        assert_eq!(spans.spans().len(), engine.chunks().chunk_count());
    }

    #[test]
    fn test_view_snapshot_builds_fresh_spans() {
        let mut engine = ChunkEngine::default();
        engine.load("a, b");
        let mut spans = SpanList::new();
        spans.apply(&engine.view_snapshot());
        assert_eq!(spans.text(), "a, b");
        assert_eq!(spans.spans().len(), 4);
    }

    #[test]
    fn test_set_pattern_does_not_retokenize() {
        let mut engine = ChunkEngine::default();
        engine.load("cat dog");
        let before = engine.chunks().clone();
        let ops = engine.set_pattern("o", true).unwrap();
        assert_eq!(engine.chunks(), &before);
        assert_eq!(ops.len(), 2); // one restyle per Word chunk
    }

    #[test]
    fn test_set_pattern_rejects_bad_regex() {
        let mut engine = ChunkEngine::default();
        engine.load("cat");
        assert!(engine.set_pattern("[", true).is_err());
        assert_eq!(engine.matcher().pattern(), r"\w+");
    }

    #[test]
    fn test_set_classifier_restyles_words() {
        let mut engine = ChunkEngine::default();
        engine.load("cat dog");
        let ops = engine.set_classifier(Box::new(WordStyles::from_map([("dog", "#00f")], None)));
        assert_eq!(
            ops,
            vec![
                ViewOp::SetRunStyle {
                    index: 0,
                    style: None
                },
                ViewOp::SetRunStyle {
                    index: 2,
                    style: Some(StyleHandle::new("#00f"))
                },
            ]
        );
    }

    #[test]
    fn test_replay_does_not_emit() {
        let mut engine = ChunkEngine::default();
        let mut history: Vec<EditDescriptor> = Vec::new();
        engine.insert_text("cat", 0, &mut history).unwrap();
        let descriptor = history.pop().unwrap();

        engine.replay(&descriptor.inverse).unwrap();
        assert_eq!(engine.text(), "");
        engine.replay(&descriptor.forward).unwrap();
        assert_eq!(engine.text(), "cat");
        assert!(history.is_empty());
    }

    #[test]
    fn test_word_before() {
        let mut engine = ChunkEngine::default();
        engine.load("cat dog");
        assert_eq!(engine.word_before(0), None);
        assert_eq!(engine.word_before(2), Some(0));
        assert_eq!(engine.word_before(3), Some(0));
        assert_eq!(engine.word_before(4), None);
        assert_eq!(engine.word_before(7), Some(2));
        assert_eq!(engine.word_before(8), None);
    }
}
