//! Word pattern matching.
//!
//! A [`PatternMatcher`] pairs a compiled regex with a polarity flag: when
//! `words_are_positive` is set the regex finds words and the gaps are
//! non-words, otherwise the regex finds separators and the gaps are words.
//!
//! Line breaks are always non-words, whatever the pattern says about them.
//!
//! Every call to [`PatternMatcher::tokenize`] runs its own `find_iter`, so no
//! scan position survives between calls.

use regex::Regex;

use crate::chunk::{Chunk, Tag};
use crate::error::EditError;

/// Default word pattern: runs of Unicode word characters
pub const DEFAULT_WORD_PATTERN: &str = r"\w+";

#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    words_are_positive: bool,
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_WORD_PATTERN).expect("default word pattern compiles"),
            words_are_positive: true,
        }
    }
}

impl PatternMatcher {
    /// Compile `pattern`. `words_are_positive` selects whether matches are words.
    pub fn new(pattern: &str, words_are_positive: bool) -> Result<Self, EditError> {
        let regex = Regex::new(pattern).map_err(|e| EditError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_regex(regex, words_are_positive))
    }

    pub fn from_regex(regex: Regex, words_are_positive: bool) -> Self {
        Self {
            regex,
            words_are_positive,
        }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn words_are_positive(&self) -> bool {
        self.words_are_positive
    }

    fn match_tag(&self) -> Tag {
        if self.words_are_positive {
            Tag::Word
        } else {
            Tag::NonWord
        }
    }

    /// Split `text` into ordered, gap-free `(tag, run)` pairs.
    ///
    /// Runs are never empty; an empty `text` yields no runs. Consecutive runs
    /// may share a tag (separate regex matches, or the pieces around a line
    /// break), so callers that need maximal runs should use
    /// [`PatternMatcher::insert_map`].
    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<(Tag, &'t str)> {
        let match_tag = self.match_tag();
        let gap_tag = match_tag.flip();
        let mut runs = Vec::new();
        let mut cursor = 0;

        for m in self.regex.find_iter(text) {
            if m.is_empty() {
                continue;
            }
            if m.start() > cursor {
                push_run(&mut runs, gap_tag, &text[cursor..m.start()]);
            }
            push_run(&mut runs, match_tag, m.as_str());
            cursor = m.end();
        }

        if cursor < text.len() {
            push_run(&mut runs, gap_tag, &text[cursor..]);
        }

        runs
    }

    /// Tokenize `text` into chunks anchored at absolute offset `anchor`.
    ///
    /// Adjacent runs of the same tag are folded together so the result obeys
    /// the same no-equal-neighbours rule as the chunk sequence.
    pub fn insert_map(&self, text: &str, anchor: usize) -> Vec<Chunk> {
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut offset = anchor;

        for (tag, run) in self.tokenize(text) {
            let len = run.chars().count();
            match chunks.last_mut() {
                Some(last) if last.tag == tag => last.text.push_str(run),
                _ => chunks.push(Chunk::new(run, tag, offset)),
            }
            offset += len;
        }

        chunks
    }

    /// Classify a single typed character
    pub fn classify_char(&self, ch: char) -> Tag {
        if is_line_break(ch) {
            return Tag::NonWord;
        }
        let mut buf = [0u8; 4];
        let s = ch.encode_utf8(&mut buf);
        if self.regex.find_iter(s).any(|m| !m.is_empty()) {
            self.match_tag()
        } else {
            self.match_tag().flip()
        }
    }
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}

/// Push `run`, carving any line breaks out of a Word run as NonWord pieces
fn push_run<'t>(runs: &mut Vec<(Tag, &'t str)>, tag: Tag, run: &'t str) {
    if tag != Tag::Word {
        runs.push((tag, run));
        return;
    }

    let mut start = 0;
    for (i, ch) in run.char_indices() {
        if !is_line_break(ch) {
            continue;
        }
        if i > start {
            runs.push((Tag::Word, &run[start..i]));
        }
        let end = i + ch.len_utf8();
        runs.push((Tag::NonWord, &run[i..end]));
        start = end;
    }
    if start < run.len() {
        runs.push((Tag::Word, &run[start..]));
    }
}
