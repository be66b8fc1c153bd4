//! wordchunk - live word/non-word chunking of editable text
//!
//! The text is kept as an ordered list of chunks, each a maximal run of word
//! or non-word characters, closed by an empty sentinel. Edits update the
//! chunks incrementally and report what a renderer has to change.

pub mod buffer;
pub mod chunk;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod document;
pub mod engine;
pub mod error;
pub mod history;
pub mod messages;
pub mod pattern;
pub mod tracing;
pub mod undo;
pub mod view;

// Re-export commonly used types
pub use chunk::{Chunk, ChunkSequence, Tag};
pub use config::ChunkerConfig;
pub use document::Document;
pub use engine::{ChunkEngine, EditOutcome};
pub use error::EditError;
pub use history::EditHistory;
pub use messages::EditMsg;
pub use pattern::PatternMatcher;
pub use undo::{EditDescriptor, EditOp, History};
pub use view::{ViewOp, WordClassifier};
