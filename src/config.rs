//! Chunker configuration persistence
//!
//! Stores user preferences in `~/.config/wordchunk/config.yaml`

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::pattern::DEFAULT_WORD_PATTERN;
use crate::undo::DEFAULT_SNIPPET_LENGTH;
use crate::view::{StyleHandle, WordStyles};

/// Chunker configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Regular expression for words (or separators, see `words_are_positive`)
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// When false, `pattern` matches separators and everything else is a word
    #[serde(default = "default_true")]
    pub words_are_positive: bool,

    /// Chars kept at each end of long undo-label snippets
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,

    /// Maximum number of undo steps
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Style per known word (case-insensitive)
    #[serde(default)]
    pub word_styles: BTreeMap<String, String>,

    /// Style for words not in `word_styles`
    #[serde(default)]
    pub unknown_word_style: Option<String>,
}

fn default_pattern() -> String {
    DEFAULT_WORD_PATTERN.to_string()
}

fn default_true() -> bool {
    true
}

fn default_snippet_length() -> usize {
    DEFAULT_SNIPPET_LENGTH
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            words_are_positive: true,
            snippet_length: default_snippet_length(),
            history_limit: default_history_limit(),
            word_styles: BTreeMap::new(),
            unknown_word_style: None,
        }
    }
}

impl ChunkerConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        let config = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to an explicit path
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Classifier built from `word_styles` and `unknown_word_style`
    pub fn word_styles(&self) -> WordStyles {
        WordStyles::from_map(
            self.word_styles.iter().map(|(word, style)| (word, style.clone())),
            self.unknown_word_style.as_deref().map(StyleHandle::new),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::WordClassifier;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ChunkerConfig = serde_yaml::from_str("words_are_positive: false\n").unwrap();
        assert!(!config.words_are_positive);
        assert_eq!(config.pattern, r"\w+");
        assert_eq!(config.snippet_length, 15);
        assert_eq!(config.history_limit, 1000);
    }

    #[test]
    fn test_word_styles() {
        let yaml = "word_styles:\n  Cat: red\nunknown_word_style: grey\n";
        let config: ChunkerConfig = serde_yaml::from_str(yaml).unwrap();
        let styles = config.word_styles();
        assert_eq!(styles.style_for("CAT"), Some(StyleHandle::new("red")));
        assert_eq!(styles.style_for("dog"), Some(StyleHandle::new("grey")));
    }
}
