//! Renderer-facing side of the chunk model.
//!
//! Every mutation returns an ordered list of [`ViewOp`]s. Applied in order to a
//! list of rendered spans that mirrored the chunk sequence before the edit,
//! they leave the spans mirroring it after the edit. The sentinel chunk has a
//! span too (the end marker), so span indices equal chunk indices.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::chunk::{Chunk, Tag};

/// Opaque style produced by a [`WordClassifier`] (e.g. a CSS colour)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleHandle(pub String);

impl StyleHandle {
    pub fn new(style: impl Into<String>) -> Self {
        Self(style.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Looks up the style for a word. Only consulted for [`Tag::Word`] chunks.
pub trait WordClassifier {
    fn style_for(&self, word: &str) -> Option<StyleHandle>;
}

/// Classifier that never styles anything
#[derive(Debug, Clone, Copy, Default)]
pub struct Unstyled;

impl WordClassifier for Unstyled {
    fn style_for(&self, _word: &str) -> Option<StyleHandle> {
        None
    }
}

/// Table-driven classifier: known words get their own style, everything else
/// gets `unknown` (if any). Lookup is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct WordStyles {
    styles: HashMap<String, StyleHandle>,
    unknown: Option<StyleHandle>,
}

impl WordStyles {
    pub fn new(unknown: Option<StyleHandle>) -> Self {
        Self {
            styles: HashMap::new(),
            unknown,
        }
    }

    pub fn from_map<I, K, V>(entries: I, unknown: Option<StyleHandle>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut styles = Self::new(unknown);
        for (word, style) in entries {
            styles.insert(word.as_ref(), StyleHandle::new(style));
        }
        styles
    }

    pub fn insert(&mut self, word: &str, style: StyleHandle) {
        self.styles.insert(word.to_lowercase(), style);
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl WordClassifier for WordStyles {
    fn style_for(&self, word: &str) -> Option<StyleHandle> {
        self.styles
            .get(&word.to_lowercase())
            .or(self.unknown.as_ref())
            .cloned()
    }
}

/// One step of a renderer update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewOp {
    /// Insert a new span so that it ends up at `index`
    InsertRunBefore {
        index: usize,
        text: String,
        tag: Tag,
        style: Option<StyleHandle>,
    },
    /// Remove the span at `index`
    RemoveRun { index: usize },
    /// Replace the text (and style) of the span at `index`
    SetRunText {
        index: usize,
        text: String,
        style: Option<StyleHandle>,
    },
    /// Restyle the span at `index` without touching its text
    SetRunStyle {
        index: usize,
        style: Option<StyleHandle>,
    },
}

/// Style a chunk would be rendered with
pub fn style_of(classifier: &dyn WordClassifier, chunk: &Chunk) -> Option<StyleHandle> {
    match chunk.tag() {
        Tag::Word => classifier.style_for(chunk.text()),
        Tag::NonWord | Tag::Sentinel => None,
    }
}

/// Minimal in-memory renderer: a span list kept in sync by applying [`ViewOp`]s.
///
/// Useful for headless callers and for checking that a stream of ops really
/// reproduces the chunk sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanList {
    spans: Vec<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tag: Tag,
    pub style: Option<StyleHandle>,
}

impl Default for SpanList {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanList {
    /// Span list for an empty buffer: just the end marker
    pub fn new() -> Self {
        Self {
            spans: vec![Span {
                text: String::new(),
                tag: Tag::Sentinel,
                style: None,
            }],
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn apply(&mut self, ops: &[ViewOp]) {
        for op in ops {
            match op {
                ViewOp::InsertRunBefore {
                    index,
                    text,
                    tag,
                    style,
                } => self.spans.insert(
                    *index,
                    Span {
                        text: text.clone(),
                        tag: *tag,
                        style: style.clone(),
                    },
                ),
                ViewOp::RemoveRun { index } => {
                    self.spans.remove(*index);
                }
                ViewOp::SetRunText { index, text, style } => {
                    let span = &mut self.spans[*index];
                    span.text = text.clone();
                    span.style = style.clone();
                }
                ViewOp::SetRunStyle { index, style } => {
                    self.spans[*index].style = style.clone();
                }
            }
        }
    }

    /// Concatenated span texts
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}
