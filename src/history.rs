//! Bounded undo/redo store for edit descriptors.

use crate::undo::{EditDescriptor, History};

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Edit history with undo/redo stacks.
///
/// Descriptors carry both directions, so undoing replays `inverse` and
/// redoing replays `forward` of the same descriptor.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<EditDescriptor>,
    redo_stack: Vec<EditDescriptor>,
    max_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Push a descriptor onto the undo stack (clears redo stack)
    pub fn push(&mut self, descriptor: EditDescriptor) {
        self.redo_stack.clear();
        self.undo_stack.push(descriptor);

        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    /// Pop the most recent edit for undoing (moves it to the redo stack)
    pub fn pop_undo(&mut self) -> Option<EditDescriptor> {
        let descriptor = self.undo_stack.pop()?;
        self.redo_stack.push(descriptor.clone());
        Some(descriptor)
    }

    /// Pop the most recently undone edit (moves it back to the undo stack)
    pub fn pop_redo(&mut self) -> Option<EditDescriptor> {
        let descriptor = self.redo_stack.pop()?;
        self.undo_stack.push(descriptor.clone());
        Some(descriptor)
    }

    /// Put back a descriptor taken by `pop_undo` whose replay failed
    pub(crate) fn restore_undo(&mut self) {
        if let Some(descriptor) = self.redo_stack.pop() {
            self.undo_stack.push(descriptor);
        }
    }

    /// Put back a descriptor taken by `pop_redo` whose replay failed
    pub(crate) fn restore_redo(&mut self) {
        if let Some(descriptor) = self.undo_stack.pop() {
            self.redo_stack.push(descriptor);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the edit `pop_undo` would return
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|d| d.inverse_label.as_str())
    }

    /// Label of the edit `pop_redo` would return
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|d| d.forward_label.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl History for EditHistory {
    fn track(&mut self, descriptor: EditDescriptor) {
        self.push(descriptor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::undo::{EditKind, EditOp};

    fn typed(ch: &str, offset: usize) -> EditDescriptor {
        EditDescriptor::for_insert(EditKind::Type, ch, offset, 15)
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = EditHistory::new();
        history.track(typed("a", 0));
        history.track(typed("b", 1));
        assert_eq!(history.undo_count(), 2);
        assert!(!history.can_redo());

        let undone = history.pop_undo().unwrap();
        assert_eq!(undone.inverse, EditOp::Delete { start: 1, end: 2 });
        assert!(history.can_redo());
        assert_eq!(history.redo_label(), Some("Type\n\"b\""));

        let redone = history.pop_redo().unwrap();
        assert_eq!(redone, undone);
        assert!(!history.can_redo());
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_history_push_clears_redo() {
        let mut history = EditHistory::new();
        history.track(typed("a", 0));
        history.pop_undo();
        assert!(history.can_redo());

        history.track(typed("b", 0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_max_size() {
        let mut history = EditHistory::with_max_size(3);
        for i in 0..5 {
            history.track(typed("x", i));
        }
        assert_eq!(history.undo_count(), 3);
        // oldest entries were dropped
        assert_eq!(
            history.pop_undo().unwrap().forward,
            EditOp::Insert {
                text: "x".to_string(),
                offset: 4
            }
        );
    }

    #[test]
    fn test_restore_after_failed_replay() {
        let mut history = EditHistory::new();
        history.track(typed("a", 0));
        history.pop_undo();
        history.restore_undo();
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);

        history.pop_undo();
        history.pop_redo();
        history.restore_redo();
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 1);
    }

    #[test]
    fn test_undo_label() {
        let mut history = EditHistory::new();
        assert_eq!(history.undo_label(), None);
        history.track(EditDescriptor::for_delete(EditKind::Cut, "cat", 0, 3, 15));
        assert_eq!(history.undo_label(), Some("Restore text\n\"cat\""));
    }
}
