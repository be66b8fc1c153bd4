//! Command-line argument parsing for the `wordchunk` binary
//!
//! Supports:
//! - Reading a file or stdin
//! - Overriding the word pattern (or switching it to separator mode)
//! - A script of edits applied in order
//! - Table or JSON output

use clap::Parser;
use std::fmt;
use std::path::PathBuf;

use crate::messages::EditMsg;

/// Split text into word and non-word chunks, optionally after applying edits
#[derive(Parser, Debug)]
#[command(name = "wordchunk", version, about = "Live word/non-word chunking of text")]
pub struct CliArgs {
    /// File to read (stdin when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Word pattern (regular expression), overrides the config file
    #[arg(short, long, value_name = "RE")]
    pub pattern: Option<String>,

    /// Treat the pattern as matching separators instead of words
    #[arg(short, long)]
    pub separators: bool,

    /// Edit to apply: insert:OFFSET:TEXT, type:CARET:TEXT, delete:START:END,
    /// backspace:CARET, undo, redo. Repeatable.
    #[arg(short, long = "edit", value_name = "OP")]
    pub edits: Vec<String>,

    /// Config file to use instead of ~/.config/wordchunk/config.yaml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One step of an edit script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedEdit {
    /// Paste `text` at `offset`
    Insert { offset: usize, text: String },
    /// Type `text` one character at a time starting at `caret`
    Type { caret: usize, text: String },
    Delete { start: usize, end: usize },
    Backspace { caret: usize },
    Undo,
    Redo,
}

impl ScriptedEdit {
    /// Messages that perform this edit on a document
    pub fn messages(&self) -> Vec<EditMsg> {
        match self {
            ScriptedEdit::Insert { offset, text } => {
                vec![EditMsg::SetCaret(*offset), EditMsg::Paste(text.clone())]
            }
            ScriptedEdit::Type { caret, text } => std::iter::once(EditMsg::SetCaret(*caret))
                .chain(text.chars().map(EditMsg::InsertChar))
                .collect(),
            ScriptedEdit::Delete { start, end } => vec![
                EditMsg::Select {
                    start: *start,
                    end: *end,
                },
                EditMsg::Cut,
            ],
            ScriptedEdit::Backspace { caret } => {
                vec![EditMsg::SetCaret(*caret), EditMsg::DeleteBackward]
            }
            ScriptedEdit::Undo => vec![EditMsg::Undo],
            ScriptedEdit::Redo => vec![EditMsg::Redo],
        }
    }
}

impl fmt::Display for ScriptedEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptedEdit::Insert { offset, text } => write!(f, "insert:{}:{}", offset, text),
            ScriptedEdit::Type { caret, text } => write!(f, "type:{}:{}", caret, text),
            ScriptedEdit::Delete { start, end } => write!(f, "delete:{}:{}", start, end),
            ScriptedEdit::Backspace { caret } => write!(f, "backspace:{}", caret),
            ScriptedEdit::Undo => write!(f, "undo"),
            ScriptedEdit::Redo => write!(f, "redo"),
        }
    }
}

/// Parse one `--edit` argument
pub fn parse_edit(spec: &str) -> Result<ScriptedEdit, String> {
    let mut parts = spec.splitn(3, ':');
    let op = parts.next().unwrap_or_default();
    let mut number = |what: &str| -> Result<usize, String> {
        let raw = parts
            .next()
            .ok_or_else(|| format!("{}: missing {}", spec, what))?;
        raw.parse()
            .map_err(|_| format!("{}: {} must be a number, got {:?}", spec, what, raw))
    };

    let edit = match op {
        "insert" => {
            let offset = number("offset")?;
            ScriptedEdit::Insert {
                offset,
                text: parts.next().unwrap_or_default().to_string(),
            }
        }
        "type" => {
            let caret = number("caret")?;
            ScriptedEdit::Type {
                caret,
                text: parts.next().unwrap_or_default().to_string(),
            }
        }
        "delete" => {
            let start = number("start")?;
            let end = number("end")?;
            ScriptedEdit::Delete { start, end }
        }
        "backspace" => ScriptedEdit::Backspace {
            caret: number("caret")?,
        },
        "undo" => ScriptedEdit::Undo,
        "redo" => ScriptedEdit::Redo,
        other => return Err(format!("unknown edit {:?}", other)),
    };
    Ok(edit)
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub pattern: Option<String>,
    pub separators: bool,
    pub edits: Vec<ScriptedEdit>,
    pub json: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let edits = self
            .edits
            .iter()
            .map(|spec| parse_edit(spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StartupConfig {
            path: self.path,
            config_path: self.config,
            pattern: self.pattern,
            separators: self.separators,
            edits,
            json: self.json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(edits: &[&str]) -> CliArgs {
        CliArgs {
            path: None,
            pattern: None,
            separators: false,
            edits: edits.iter().map(|s| s.to_string()).collect(),
            config: None,
            json: false,
        }
    }

    #[test]
    fn test_parse_edits() {
        assert_eq!(
            parse_edit("insert:3:a:b").unwrap(),
            ScriptedEdit::Insert {
                offset: 3,
                text: "a:b".to_string()
            }
        );
        assert_eq!(
            parse_edit("delete:1:4").unwrap(),
            ScriptedEdit::Delete { start: 1, end: 4 }
        );
        assert_eq!(
            parse_edit("backspace:2").unwrap(),
            ScriptedEdit::Backspace { caret: 2 }
        );
        assert_eq!(parse_edit("undo").unwrap(), ScriptedEdit::Undo);
        assert_eq!(
            parse_edit("type:0:").unwrap(),
            ScriptedEdit::Type {
                caret: 0,
                text: String::new()
            }
        );
    }

    #[test]
    fn test_parse_edit_errors() {
        assert!(parse_edit("insert").is_err());
        assert!(parse_edit("delete:1").is_err());
        assert!(parse_edit("delete:x:2").is_err());
        assert!(parse_edit("frobnicate:1").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for spec in ["insert:0:hi", "delete:2:5", "backspace:1", "redo"] {
            assert_eq!(parse_edit(spec).unwrap().to_string(), spec);
        }
    }

    #[test]
    fn test_into_config_rejects_bad_edit() {
        assert!(args(&["undo", "bogus"]).into_config().is_err());
        let config = args(&["undo", "delete:0:1"]).into_config().unwrap();
        assert_eq!(config.edits.len(), 2);
    }

    #[test]
    fn test_messages() {
        let msgs = ScriptedEdit::Type {
            caret: 2,
            text: "ab".to_string(),
        }
        .messages();
        assert_eq!(
            msgs,
            vec![
                EditMsg::SetCaret(2),
                EditMsg::InsertChar('a'),
                EditMsg::InsertChar('b')
            ]
        );
    }

    #[test]
    fn test_clap_parses_repeated_edits() {
        let args = CliArgs::parse_from([
            "wordchunk",
            "file.txt",
            "-e",
            "undo",
            "--edit",
            "redo",
            "--json",
        ]);
        assert_eq!(args.edits, vec!["undo", "redo"]);
        assert!(args.json);
        assert_eq!(args.path, Some(PathBuf::from("file.txt")));
    }
}
