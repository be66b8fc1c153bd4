//! Error taxonomy for chunk edits
//!
//! Recoverable conditions are reported to the caller and leave every piece of
//! state untouched. Zero-length deletes are not errors at all: they come back
//! as an empty [`EditOutcome`](crate::engine::EditOutcome).

/// Errors that can occur when applying an edit to the chunk model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Payload could not be treated as text (e.g. clipboard bytes that are not UTF-8)
    InvalidInput { reason: String },
    /// An offset addressed a position beyond `[0, len]`
    OffsetOutOfRange { offset: usize, len: usize },
    /// A range with `start > end`
    InvalidRange { start: usize, end: usize },
    /// The word/separator pattern failed to compile
    InvalidPattern { pattern: String, message: String },
}

impl EditError {
    pub(crate) fn out_of_range(offset: usize, len: usize) -> Self {
        Self::OffsetOutOfRange { offset, len }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { reason } => format!("Cannot insert non-text content: {}", reason),
            Self::OffsetOutOfRange { offset, len } => {
                format!("Position {} is outside the text (length {})", offset, len)
            }
            Self::InvalidRange { start, end } => {
                format!("Selection {}-{} is reversed", start, end)
            }
            Self::InvalidPattern { pattern, .. } => {
                format!("Word pattern {:?} is not a valid regular expression", pattern)
            }
        }
    }
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { reason } => write!(f, "invalid input: {}", reason),
            Self::OffsetOutOfRange { offset, len } => {
                write!(f, "offset {} out of range 0..={}", offset, len)
            }
            Self::InvalidRange { start, end } => write!(f, "invalid range {}..{}", start, end),
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern {:?}: {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for EditError {}
