use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use wordchunk::buffer::{RopeBuffer, TextBuffer};
use wordchunk::chunk::ChunkSequence;
use wordchunk::cli::{CliArgs, ScriptedEdit, StartupConfig};
use wordchunk::{ChunkerConfig, Document};

fn main() -> Result<()> {
    wordchunk::tracing::init();

    let startup = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;
    let config = chunker_config(&startup)?;

    let input = read_input(startup.path.as_deref())?;
    let mut document =
        Document::from_config(RopeBuffer::new(), &config).context("Invalid word pattern")?;
    document
        .load_bytes(&input)
        .context("Input is not valid text")?;

    for edit in &startup.edits {
        apply(&mut document, edit).with_context(|| format!("Edit `{}` failed", edit))?;
    }

    if startup.json {
        print_json(&document)?;
    } else {
        print_table(&document);
    }
    Ok(())
}

fn chunker_config(startup: &StartupConfig) -> Result<ChunkerConfig> {
    let mut config = match &startup.config_path {
        Some(path) => ChunkerConfig::load_from(path).map_err(anyhow::Error::msg)?,
        None => ChunkerConfig::load(),
    };
    if let Some(pattern) = &startup.pattern {
        config.pattern = pattern.clone();
    }
    if startup.separators {
        config.words_are_positive = false;
    }
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read stdin")?;
            Ok(bytes)
        }
    }
}

fn apply(document: &mut Document<RopeBuffer>, edit: &ScriptedEdit) -> Result<()> {
    for msg in edit.messages() {
        document.update(msg)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    text: String,
    #[serde(flatten)]
    chunks: &'a ChunkSequence,
    undo: Option<&'a str>,
    redo: Option<&'a str>,
}

fn print_json(document: &Document<RopeBuffer>) -> Result<()> {
    let report = Report {
        text: document.text(),
        chunks: document.engine().chunks(),
        undo: document.history().undo_label(),
        redo: document.history().redo_label(),
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize chunks")?;
    println!("{}", json);
    Ok(())
}

fn print_table(document: &Document<RopeBuffer>) {
    let buffer = document.buffer();
    println!("{:>5}  {:<8}  {:>9}  TEXT", "INDEX", "TAG", "LINE:COL");
    for (index, chunk) in document.engine().chunks().iter().enumerate() {
        let (line, column) = buffer.offset_to_position(chunk.start());
        let position = format!("{}:{}", line + 1, column + 1);
        println!(
            "{:>5}  {:<8}  {:>9}  {:?}",
            index,
            chunk.tag().label(),
            position,
            chunk.text()
        );
    }
    println!(
        "{} chunks, {} lines",
        document.engine().chunks().chunk_count() - 1,
        buffer.line_count()
    );
}
