//! Undo descriptors: forward/inverse operation pairs with readable labels.
//!
//! The engine builds one [`EditDescriptor`] per caller-visible mutation and
//! hands it to a [`History`] before mutating. It keeps no reference to it.
//! Replays go through [`ChunkEngine::replay`](crate::engine::ChunkEngine::replay),
//! which never emits descriptors.

use serde::Serialize;

/// Default bound for label snippets (chars kept at each end)
pub const DEFAULT_SNIPPET_LENGTH: usize = 15;

/// A replayable edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Insert { text: String, offset: usize },
    Delete { start: usize, end: usize },
}

impl EditOp {
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::Insert { .. } => "insert",
            EditOp::Delete { .. } => "delete",
        }
    }
}

/// What the user did to trigger an edit (drives the labels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Type,
    Paste,
    Cut,
    Backspace,
    DeleteForward,
}

/// Forward/inverse operation pair handed to the history collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDescriptor {
    pub kind: EditKind,
    pub forward: EditOp,
    pub forward_label: String,
    pub inverse: EditOp,
    pub inverse_label: String,
}

impl EditDescriptor {
    /// Descriptor for inserting `text` at `offset`
    pub fn for_insert(kind: EditKind, text: &str, offset: usize, snippet_length: usize) -> Self {
        let len = text.chars().count();
        let end = offset + len;
        let snip = snippet(text, snippet_length);

        let forward_label = match kind {
            EditKind::Type => format!("Type\n{}", snip),
            _ => format!("Paste {} chars\n{}", len, snip),
        };

        Self {
            kind,
            forward: EditOp::Insert {
                text: text.to_string(),
                offset,
            },
            forward_label,
            inverse: EditOp::Delete { start: offset, end },
            inverse_label: format!("Cut chars {}-{}\n{}", offset, end, snip),
        }
    }

    /// Descriptor for removing `removed`, which occupies `start..end`
    pub fn for_delete(
        kind: EditKind,
        removed: &str,
        start: usize,
        end: usize,
        snippet_length: usize,
    ) -> Self {
        let snip = snippet(removed, snippet_length);

        let forward_label = match kind {
            EditKind::Backspace => format!("Backspace\n{}", snip),
            EditKind::DeleteForward => format!("Delete\n{}", snip),
            _ => format!("Cut chars {}-{}\n{}", start, end, snip),
        };

        Self {
            kind,
            forward: EditOp::Delete { start, end },
            forward_label,
            inverse: EditOp::Insert {
                text: removed.to_string(),
                offset: start,
            },
            inverse_label: format!("Restore text\n{}", snip),
        }
    }
}

/// Short quoted rendering of `text` for labels.
///
/// Whitespace-only text becomes `<whitespace>`. Text longer than
/// `2 * bound + 5` chars keeps `bound` chars at each end around ` ... `.
pub fn snippet(text: &str, bound: usize) -> String {
    if text.chars().all(char::is_whitespace) {
        return "<whitespace>".to_string();
    }

    let len = text.chars().count();
    if len > bound * 2 + 5 {
        let head: String = text.chars().take(bound).collect();
        let tail: String = text.chars().skip(len - bound).collect();
        format!("\"{} ... {}\"", head, tail)
    } else {
        format!("\"{}\"", text)
    }
}

/// External reversible-history store
pub trait History {
    fn track(&mut self, descriptor: EditDescriptor);
}

/// Collects descriptors in emission order
impl History for Vec<EditDescriptor> {
    fn track(&mut self, descriptor: EditDescriptor) {
        self.push(descriptor);
    }
}

/// Discards every descriptor
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl History for NoHistory {
    fn track(&mut self, _descriptor: EditDescriptor) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_whitespace() {
        assert_eq!(snippet("  \n\t", 15), "<whitespace>");
        assert_eq!(snippet("", 15), "<whitespace>");
    }

    #[test]
    fn test_snippet_short_is_quoted() {
        assert_eq!(snippet("cat", 15), "\"cat\"");
    }

    #[test]
    fn test_snippet_at_bound_is_verbatim() {
        let text = "a".repeat(35);
        assert_eq!(snippet(&text, 15), format!("\"{}\"", text));
    }

    #[test]
    fn test_snippet_elides_middle() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(snippet(text, 3), "\"abc ... 789\"");
    }

    #[test]
    fn test_snippet_counts_chars() {
        let text = "ééééé-ééééé-ééééé";
        assert_eq!(snippet(text, 2), "\"éé ... éé\"");
    }

    #[test]
    fn test_insert_descriptor() {
        let d = EditDescriptor::for_insert(EditKind::Paste, "dog", 4, 15);
        assert_eq!(
            d.forward,
            EditOp::Insert {
                text: "dog".to_string(),
                offset: 4
            }
        );
        assert_eq!(d.inverse, EditOp::Delete { start: 4, end: 7 });
        assert_eq!(d.forward_label, "Paste 3 chars\n\"dog\"");
        assert_eq!(d.inverse_label, "Cut chars 4-7\n\"dog\"");
    }

    #[test]
    fn test_delete_descriptor() {
        let d = EditDescriptor::for_delete(EditKind::Cut, " dog", 3, 7, 15);
        assert_eq!(d.forward, EditOp::Delete { start: 3, end: 7 });
        assert_eq!(
            d.inverse,
            EditOp::Insert {
                text: " dog".to_string(),
                offset: 3
            }
        );
        assert_eq!(d.forward_label, "Cut chars 3-7\n\" dog\"");
        assert_eq!(d.inverse_label, "Restore text\n\" dog\"");
    }

    #[test]
    fn test_typing_labels() {
        let d = EditDescriptor::for_insert(EditKind::Type, " ", 3, 15);
        assert_eq!(d.forward_label, "Type\n<whitespace>");
        let d = EditDescriptor::for_delete(EditKind::Backspace, "t", 2, 3, 15);
        assert_eq!(d.forward_label, "Backspace\n\"t\"");
    }

    #[test]
    fn test_vec_history_collects() {
        let mut history: Vec<EditDescriptor> = Vec::new();
        history.track(EditDescriptor::for_insert(EditKind::Type, "a", 0, 15));
        assert_eq!(history.len(), 1);
    }
}
