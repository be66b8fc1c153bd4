//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::Rng;
use wordchunk::buffer::StringBuffer;
use wordchunk::view::SpanList;
use wordchunk::{ChunkEngine, Document, History, Tag};

/// `(tag, text, start)` for every chunk, sentinel included
pub fn shape(engine: &ChunkEngine) -> Vec<(Tag, String, usize)> {
    engine
        .chunks()
        .iter()
        .map(|c| (c.tag(), c.text().to_string(), c.start()))
        .collect()
}

/// Engine with `text` loaded under the default pattern
pub fn loaded(text: &str) -> ChunkEngine {
    let mut engine = ChunkEngine::default();
    engine.load(text);
    engine
}

/// Type `text` one char at a time from `caret`, returning the new caret
pub fn type_str(
    engine: &mut ChunkEngine,
    caret: usize,
    text: &str,
    history: &mut dyn History,
) -> usize {
    let mut caret = caret;
    for ch in text.chars() {
        engine
            .insert_char(ch, caret, history)
            .expect("caret within bounds");
        caret += 1;
    }
    caret
}

/// Document over a `StringBuffer` with the default engine
pub fn document(text: &str) -> Document<StringBuffer> {
    Document::new(StringBuffer::from_text(text), ChunkEngine::default())
}

/// Assert the structural invariants and that `spans` mirrors the chunks
pub fn assert_consistent(engine: &ChunkEngine, spans: &SpanList) {
    if let Err(violation) = engine.chunks().verify() {
        panic!("{} in {:?}", violation, shape(engine));
    }
    let span_shape: Vec<(Tag, &str)> = spans
        .spans()
        .iter()
        .map(|s| (s.tag, s.text.as_str()))
        .collect();
    let chunk_shape: Vec<(Tag, &str)> = engine
        .chunks()
        .iter()
        .map(|c| (c.tag(), c.text()))
        .collect();
    assert_eq!(span_shape, chunk_shape, "view ops drifted from chunks");
}

/// Characters used by the sweeps: word chars, separators, a newline, multibyte
pub const ALPHABET: &[char] = &['a', 'b', 'Z', '7', '_', ' ', ',', '.', '\n', 'é', '日', '-'];

/// One char from [`ALPHABET`]
pub fn random_char(rng: &mut StdRng) -> char {
    ALPHABET[rng.gen_range(0..ALPHABET.len())]
}

/// Random text of up to `max_len` chars from [`ALPHABET`]
pub fn random_text(rng: &mut StdRng, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| random_char(rng)).collect()
}
