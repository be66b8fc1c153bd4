//! Document: a host text buffer, its chunk engine, undo history, caret and
//! selection, driven by [`EditMsg`]s.
//!
//! Every edit goes to the engine first. The engine rejects bad input before
//! changing anything, so the buffer is only touched once the chunk sequence
//! has been updated, and the two never disagree about the text.

use std::ops::Range;

use crate::buffer::TextBufferMut;
use crate::chunk::Tag;
use crate::config::ChunkerConfig;
use crate::engine::{ChunkEngine, EditOutcome};
use crate::error::EditError;
use crate::history::EditHistory;
use crate::messages::EditMsg;
use crate::undo::{EditKind, EditOp};
use crate::view::{ViewOp, WordClassifier};

/// Editable text with live chunking
#[derive(Debug)]
pub struct Document<B: TextBufferMut> {
    buffer: B,
    engine: ChunkEngine,
    history: EditHistory,
    caret: usize,
    /// Non-empty selected range, start < end
    selection: Option<(usize, usize)>,
    /// Word chunk under the caret, shown unstyled
    active_word: Option<usize>,
}

impl<B: TextBufferMut> Document<B> {
    /// Wrap `buffer`, chunking its current content. The caret starts at the end.
    pub fn new(buffer: B, engine: ChunkEngine) -> Self {
        Self::with_history(buffer, engine, EditHistory::new())
    }

    pub fn with_history(buffer: B, mut engine: ChunkEngine, history: EditHistory) -> Self {
        engine.load(&buffer.content());
        let caret = buffer.len_chars();
        Self {
            buffer,
            engine,
            history,
            caret,
            selection: None,
            active_word: None,
        }
    }

    pub fn from_config(buffer: B, config: &ChunkerConfig) -> Result<Self, EditError> {
        let engine = ChunkEngine::from_config(config)?;
        Ok(Self::with_history(
            buffer,
            engine,
            EditHistory::with_max_size(config.history_limit),
        ))
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn engine(&self) -> &ChunkEngine {
        &self.engine
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn text(&self) -> String {
        self.buffer.content()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.map(|(start, end)| start..end)
    }

    pub fn selected_text(&self) -> String {
        match self.selection {
            Some((start, end)) => self.buffer.slice(start..end),
            None => String::new(),
        }
    }

    pub fn active_word(&self) -> Option<usize> {
        self.active_word
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Ops that draw the whole document in a fresh renderer
    pub fn view_snapshot(&self) -> Vec<ViewOp> {
        let mut view = self.engine.view_snapshot();
        if let Some(index) = self.active_word {
            view.push(ViewOp::SetRunStyle { index, style: None });
        }
        view
    }

    /// Apply one message and return the renderer updates it produced
    pub fn update(&mut self, msg: EditMsg) -> Result<Vec<ViewOp>, EditError> {
        tracing::trace!(target: "document", ?msg, caret = self.caret, "update");
        let result = match msg {
            EditMsg::SetCaret(caret) => self.set_caret(caret),
            EditMsg::Select { start, end } => self.select(start, end),
            EditMsg::InsertChar(ch) => self.type_char(ch),
            EditMsg::InsertNewline => self.type_char('\n'),
            EditMsg::Paste(text) => self.paste(&text),
            EditMsg::PasteBytes(bytes) => self.paste_bytes(&bytes),
            EditMsg::DeleteBackward => self.delete_backward(),
            EditMsg::DeleteForward => self.delete_forward(),
            EditMsg::Cut => self.cut(),
            EditMsg::Undo => self.undo(),
            EditMsg::Redo => self.redo(),
            EditMsg::Load(text) => Ok(self.load(&text)),
            EditMsg::SetPattern {
                pattern,
                words_are_positive,
            } => self.set_pattern(&pattern, words_are_positive),
        };
        if let Err(err) = &result {
            tracing::warn!(target: "document", %err, "edit rejected");
        }
        result
    }

    // =========================================================================
    // Caret and selection
    // =========================================================================

    pub fn set_caret(&mut self, caret: usize) -> Result<Vec<ViewOp>, EditError> {
        self.check_offset(caret)?;
        self.caret = caret;
        self.selection = None;
        Ok(self.finish(Vec::new(), false))
    }

    /// Select `start..end` with the caret at `end`. An empty range just moves the caret.
    pub fn select(&mut self, start: usize, end: usize) -> Result<Vec<ViewOp>, EditError> {
        if start > end {
            return Err(EditError::InvalidRange { start, end });
        }
        self.check_offset(end)?;
        self.caret = end;
        self.selection = (start < end).then_some((start, end));
        Ok(self.finish(Vec::new(), false))
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Type one character, replacing the selection if there is one
    pub fn type_char(&mut self, ch: char) -> Result<Vec<ViewOp>, EditError> {
        let mut view = self.cut_selection()?;
        let outcome = self.engine.insert_char(ch, self.caret, &mut self.history)?;
        view.extend(self.mirror(outcome));
        Ok(self.finish(view, true))
    }

    /// Paste text, replacing the selection if there is one
    pub fn paste(&mut self, text: &str) -> Result<Vec<ViewOp>, EditError> {
        let mut view = self.cut_selection()?;
        let outcome = self
            .engine
            .insert_text_as(EditKind::Paste, text, self.caret, &mut self.history)?;
        view.extend(self.mirror(outcome));
        Ok(self.finish(view, true))
    }

    /// Paste raw bytes. Anything that is not valid UTF-8 is rejected untouched.
    pub fn paste_bytes(&mut self, bytes: &[u8]) -> Result<Vec<ViewOp>, EditError> {
        let text = decode(bytes)?;
        self.paste(text)
    }

    /// Backspace: remove the selection, or the char before the caret
    pub fn delete_backward(&mut self) -> Result<Vec<ViewOp>, EditError> {
        if self.selection.is_some() {
            let view = self.cut_selection()?;
            return Ok(self.finish(view, true));
        }
        let outcome = self.engine.backspace(self.caret, &mut self.history)?;
        let view = self.mirror(outcome);
        Ok(self.finish(view, true))
    }

    /// Delete key: remove the selection, or the char after the caret
    pub fn delete_forward(&mut self) -> Result<Vec<ViewOp>, EditError> {
        if self.selection.is_some() {
            let view = self.cut_selection()?;
            return Ok(self.finish(view, true));
        }
        let outcome = self.engine.delete_forward(self.caret, &mut self.history)?;
        let view = self.mirror(outcome);
        Ok(self.finish(view, true))
    }

    /// Remove the selection. Without one this does nothing.
    pub fn cut(&mut self) -> Result<Vec<ViewOp>, EditError> {
        let view = self.cut_selection()?;
        Ok(self.finish(view, true))
    }

    pub fn undo(&mut self) -> Result<Vec<ViewOp>, EditError> {
        let descriptor = match self.history.pop_undo() {
            Some(descriptor) => descriptor,
            None => return Ok(Vec::new()),
        };
        tracing::debug!(target: "document", label = %descriptor.inverse_label, "undo");

        let outcome = match self.engine.replay(&descriptor.inverse) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.history.restore_undo();
                return Err(err);
            }
        };
        self.selection = None;
        let view = self.mirror(outcome);
        Ok(self.finish(view, true))
    }

    pub fn redo(&mut self) -> Result<Vec<ViewOp>, EditError> {
        let descriptor = match self.history.pop_redo() {
            Some(descriptor) => descriptor,
            None => return Ok(Vec::new()),
        };
        tracing::debug!(target: "document", label = %descriptor.forward_label, "redo");

        let outcome = match self.engine.replay(&descriptor.forward) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.history.restore_redo();
                return Err(err);
            }
        };
        self.selection = None;
        let view = self.mirror(outcome);
        Ok(self.finish(view, true))
    }

    /// Replace the whole text. Clears history; the caret goes to the end.
    pub fn load(&mut self, text: &str) -> Vec<ViewOp> {
        let outcome = self.engine.load(text);
        self.buffer.set_content(text);
        self.history.clear();
        self.caret = self.buffer.len_chars();
        self.selection = None;
        // Every run was rebuilt with its full style.
        self.active_word = None;
        self.debug_check_sync();
        self.finish(outcome.view, true)
    }

    /// Replace the whole text with raw bytes, which must be valid UTF-8
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<Vec<ViewOp>, EditError> {
        let text = decode(bytes)?;
        Ok(self.load(text))
    }

    /// Switch the word pattern. Chunks keep their boundaries and are restyled.
    pub fn set_pattern(
        &mut self,
        pattern: &str,
        words_are_positive: bool,
    ) -> Result<Vec<ViewOp>, EditError> {
        let view = self.engine.set_pattern(pattern, words_are_positive)?;
        Ok(self.finish(view, true))
    }

    pub fn set_classifier(&mut self, classifier: Box<dyn WordClassifier>) -> Vec<ViewOp> {
        let view = self.engine.set_classifier(classifier);
        self.finish(view, true)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_offset(&self, offset: usize) -> Result<(), EditError> {
        let len = self.engine.len_chars();
        if offset > len {
            return Err(EditError::out_of_range(offset, len));
        }
        Ok(())
    }

    fn cut_selection(&mut self) -> Result<Vec<ViewOp>, EditError> {
        let (start, end) = match self.selection {
            Some(range) => range,
            None => return Ok(Vec::new()),
        };
        let outcome = self.engine.delete(start, end, &mut self.history)?;
        self.selection = None;
        Ok(self.mirror(outcome))
    }

    /// Apply the engine's buffer change to the host buffer and place the caret
    fn mirror(&mut self, outcome: EditOutcome) -> Vec<ViewOp> {
        match &outcome.applied {
            Some(EditOp::Insert { text, offset }) => {
                self.buffer.insert(*offset, text);
                self.caret = offset + text.chars().count();
            }
            Some(EditOp::Delete { start, end }) => {
                self.buffer.remove(*start..*end);
                self.caret = *start;
            }
            None => {}
        }
        self.debug_check_sync();
        outcome.view
    }

    /// Keep the word under the caret unstyled and restore the one before it.
    ///
    /// The previous word is followed through `view` first, since the edit may
    /// have moved it. After an edit the current word is re-cleared even if it
    /// did not change, since the edit may have re-sent its full style.
    fn finish(&mut self, mut view: Vec<ViewOp>, edited: bool) -> Vec<ViewOp> {
        let current = self.engine.word_before(self.caret);
        let previous = self.active_word.and_then(|index| follow_run(index, &view));
        if current == previous && !edited {
            return view;
        }

        if let Some(index) = previous.filter(|&i| Some(i) != current) {
            if self.engine.chunks().get(index).map(|c| c.tag()) == Some(Tag::Word) {
                view.push(ViewOp::SetRunStyle {
                    index,
                    style: self.engine.style_at(index),
                });
            }
        }
        if let Some(index) = current {
            view.push(ViewOp::SetRunStyle { index, style: None });
        }
        self.active_word = current;
        view
    }

    fn debug_check_sync(&self) {
        debug_assert_eq!(
            self.buffer.len_chars(),
            self.engine.len_chars(),
            "buffer and chunk sequence out of sync"
        );
    }
}

/// Where run `index` ends up once `view` is applied; None if it was removed
fn follow_run(mut index: usize, view: &[ViewOp]) -> Option<usize> {
    for op in view {
        match *op {
            ViewOp::InsertRunBefore { index: at, .. } if at <= index => index += 1,
            ViewOp::RemoveRun { index: at } if at == index => return None,
            ViewOp::RemoveRun { index: at } if at < index => index -= 1,
            _ => {}
        }
    }
    Some(index)
}

fn decode(bytes: &[u8]) -> Result<&str, EditError> {
    std::str::from_utf8(bytes).map_err(|e| EditError::InvalidInput {
        reason: format!("text is not valid UTF-8: {}", e),
    })
}
