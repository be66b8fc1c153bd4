//! Messages a host sends to a [`Document`](crate::document::Document).

/// One user action against the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMsg {
    // === Caret and selection ===
    /// Move the caret, collapsing any selection
    SetCaret(usize),
    /// Select `start..end`; the caret goes to `end`
    Select { start: usize, end: usize },

    // === Insertion ===
    /// Type a single character (replaces the selection)
    InsertChar(char),
    /// Enter key; typed as `'\n'`
    InsertNewline,
    /// Paste text (replaces the selection)
    Paste(String),
    /// Paste raw clipboard bytes; rejected unless valid UTF-8
    PasteBytes(Vec<u8>),

    // === Deletion ===
    /// Backspace
    DeleteBackward,
    /// Delete key
    DeleteForward,
    /// Remove the selection
    Cut,

    // === Undo/Redo ===
    Undo,
    Redo,

    // === Whole document ===
    /// Replace everything; clears history
    Load(String),
    /// Switch the word pattern; existing chunks are only restyled
    SetPattern {
        pattern: String,
        words_are_positive: bool,
    },
}
