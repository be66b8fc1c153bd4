//! Deletion of a char range, plus the Backspace/Delete-key specializations.

use super::{ChunkEngine, EditOutcome};
use crate::chunk::{byte_index, Side};
use crate::error::EditError;
use crate::undo::{EditDescriptor, EditKind, EditOp, History};
use crate::view::ViewOp;

impl ChunkEngine {
    /// Cut `start..end`
    pub fn delete(
        &mut self,
        start: usize,
        end: usize,
        history: &mut dyn History,
    ) -> Result<EditOutcome, EditError> {
        self.delete_as(EditKind::Cut, start, end, history)
    }

    /// Delete `start..end`, labelling the descriptor with `kind`
    pub fn delete_as(
        &mut self,
        kind: EditKind,
        start: usize,
        end: usize,
        history: &mut dyn History,
    ) -> Result<EditOutcome, EditError> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(EditOutcome::default());
        }

        let removed = self.chunks.slice(start..end);
        history.track(EditDescriptor::for_delete(
            kind,
            &removed,
            start,
            end,
            self.snippet_length,
        ));
        self.cut_range(start, end, removed)
    }

    /// Remove the char before `caret`. No-op at the start of the buffer.
    pub fn backspace(
        &mut self,
        caret: usize,
        history: &mut dyn History,
    ) -> Result<EditOutcome, EditError> {
        self.check_offset(caret)?;
        if caret == 0 {
            return Ok(EditOutcome::default());
        }
        self.delete_as(EditKind::Backspace, caret - 1, caret, history)
    }

    /// Remove the char after `caret`. No-op at the end of the buffer.
    pub fn delete_forward(
        &mut self,
        caret: usize,
        history: &mut dyn History,
    ) -> Result<EditOutcome, EditError> {
        self.check_offset(caret)?;
        if caret == self.len_chars() {
            return Ok(EditOutcome::default());
        }
        self.delete_as(EditKind::DeleteForward, caret, caret + 1, history)
    }

    pub(super) fn apply_delete(
        &mut self,
        start: usize,
        end: usize,
    ) -> Result<EditOutcome, EditError> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(EditOutcome::default());
        }
        let removed = self.chunks.slice(start..end);
        self.cut_range(start, end, removed)
    }

    /// Remove the non-empty, validated range `start..end`, whose text is `removed`
    fn cut_range(
        &mut self,
        start: usize,
        end: usize,
        removed: String,
    ) -> Result<EditOutcome, EditError> {
        let before = self.chunks.boundary_context(start, Side::Before)?;
        let after = self.chunks.position_after(end)?;
        let mut view = Vec::new();

        match before.position() {
            Some(b) if b.chunk_index == after.chunk_index => {
                // Both ends inside one chunk: cut the middle out of it.
                let index = b.chunk_index;
                let chunk = self.chunks.chunk_mut(index);
                let from = byte_index(&chunk.text, b.char_in_chunk);
                let to = byte_index(&chunk.text, after.char_in_chunk);
                chunk.text.replace_range(from..to, "");

                if chunk.text.is_empty() && !chunk.is_sentinel() {
                    self.emit_remove(&mut view, index);
                    if index > 0 {
                        self.coalesce(index - 1, &mut view);
                    }
                } else {
                    self.emit_set_text(&mut view, index);
                }
            }
            _ => {
                let first_between = before.chunk_index().map_or(0, |b| b + 1);
                for _ in first_between..after.chunk_index {
                    self.emit_remove(&mut view, first_between);
                }

                // The chunk holding `end` now sits right after the prefix chunk.
                // Its remaining text begins at `end`; the final shift moves it to `start`.
                let suffix_index = first_between;
                {
                    let chunk = self.chunks.chunk_mut(suffix_index);
                    let cut = byte_index(&chunk.text, after.char_in_chunk);
                    chunk.text.replace_range(..cut, "");
                    chunk.start = end;
                }

                match before.position() {
                    Some(b) if b.tag == after.tag => {
                        self.merge_across_cut(b.chunk_index, b.char_in_chunk, &mut view)
                    }
                    Some(b) => self.adjoin_across_cut(
                        b.chunk_index,
                        b.char_in_chunk,
                        after.char_in_chunk,
                        &mut view,
                    ),
                    None => self.trim_leading_suffix(suffix_index, after.char_in_chunk, &mut view),
                }
            }
        }

        let from = self.chunks.first_starting_at(end);
        self.chunks.shift_left(from, end - start);

        self.check_invariants();
        tracing::debug!(
            target: "chunks",
            start,
            end,
            chunks = self.chunks.chunk_count(),
            "delete"
        );

        Ok(EditOutcome {
            view,
            applied: Some(EditOp::Delete { start, end }),
            removed,
        })
    }

    /// Same tag on both sides of the cut: prefix and suffix become one chunk.
    fn merge_across_cut(&mut self, prefix_index: usize, keep: usize, view: &mut Vec<ViewOp>) {
        let suffix = self.chunks.remove(prefix_index + 1);
        let chunk = self.chunks.chunk_mut(prefix_index);
        chunk.text.truncate(byte_index(&chunk.text, keep));
        chunk.text.push_str(&suffix.text);

        self.emit_set_text(view, prefix_index);
        view.push(ViewOp::RemoveRun {
            index: prefix_index + 1,
        });
    }

    /// Different tags: keep prefix and suffix as separate neighbours, dropping
    /// either one if nothing of it survived.
    fn adjoin_across_cut(
        &mut self,
        prefix_index: usize,
        keep: usize,
        suffix_cut: usize,
        view: &mut Vec<ViewOp>,
    ) {
        let suffix_index = prefix_index + 1;
        let suffix = &self.chunks.as_slice()[suffix_index];
        if suffix.text.is_empty() && !suffix.is_sentinel() {
            self.emit_remove(view, suffix_index);
        } else if suffix_cut > 0 {
            self.emit_set_text(view, suffix_index);
        }

        let prefix = self.chunks.chunk_mut(prefix_index);
        let prefix_len = prefix.len_chars();
        prefix.text.truncate(byte_index(&prefix.text, keep));

        if prefix.text.is_empty() {
            self.emit_remove(view, prefix_index);
            if prefix_index > 0 {
                self.coalesce(prefix_index - 1, view);
            }
        } else if keep < prefix_len {
            self.emit_set_text(view, prefix_index);
        }
    }

    /// Cut from the start of the buffer: only the suffix survives.
    fn trim_leading_suffix(
        &mut self,
        suffix_index: usize,
        suffix_cut: usize,
        view: &mut Vec<ViewOp>,
    ) {
        let suffix = &self.chunks.as_slice()[suffix_index];
        if suffix.text.is_empty() && !suffix.is_sentinel() {
            self.emit_remove(view, suffix_index);
        } else if suffix_cut > 0 {
            self.emit_set_text(view, suffix_index);
        }
    }
}
