use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptAlignerConfig {
    /// Sentences with at most this many words use the short ahead window.
    pub short_sentence_max_words: usize,
    pub short_ahead_window: usize,
    pub long_ahead_window: usize,
    /// Split/merge recoveries tolerated inside one sentence.
    pub max_skip_recoveries: usize,
    /// Extra candidates before the expected position. Never reaches the
    /// start of the previous match.
    pub look_back: usize,
}

impl TranscriptAlignerConfig {
    pub const DEFAULT_SHORT_SENTENCE_MAX_WORDS: usize = 3;
    pub const DEFAULT_SHORT_AHEAD_WINDOW: usize = 100;
    pub const DEFAULT_LONG_AHEAD_WINDOW: usize = 200;
    pub const DEFAULT_MAX_SKIP_RECOVERIES: usize = 2;

    pub fn ahead_window(&self, word_count: usize) -> usize {
        if word_count <= self.short_sentence_max_words {
            self.short_ahead_window
        } else {
            self.long_ahead_window
        }
    }
}

impl Default for TranscriptAlignerConfig {
    fn default() -> Self {
        Self {
            short_sentence_max_words: Self::DEFAULT_SHORT_SENTENCE_MAX_WORDS,
            short_ahead_window: Self::DEFAULT_SHORT_AHEAD_WINDOW,
            long_ahead_window: Self::DEFAULT_LONG_AHEAD_WINDOW,
            max_skip_recoveries: Self::DEFAULT_MAX_SKIP_RECOVERIES,
            look_back: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BilingualAlignerConfig {
    pub look_back: usize,
    pub look_ahead: usize,
    /// Sentences above this many words use `long_min_ratio`.
    pub long_sentence_min_words: usize,
    pub long_min_ratio: f64,
    pub short_min_ratio: f64,
}

impl BilingualAlignerConfig {
    pub const DEFAULT_LOOK_BACK: usize = 12;
    pub const DEFAULT_LOOK_AHEAD: usize = 30;
}

impl Default for BilingualAlignerConfig {
    fn default() -> Self {
        Self {
            look_back: Self::DEFAULT_LOOK_BACK,
            look_ahead: Self::DEFAULT_LOOK_AHEAD,
            long_sentence_min_words: 6,
            long_min_ratio: 0.42,
            short_min_ratio: 0.55,
        }
    }
}

/// Language-specific data tables used by the word and overlap matchers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageProfile {
    pub name: String,
    /// Spelling variants treated as the same word, in either direction.
    pub equivalent_words: Vec<(String, String)>,
    /// Function words ignored by lexical overlap.
    pub stopwords: Vec<String>,
    /// Character substitutions applied before comparing words.
    pub char_folds: Vec<(char, char)>,
}

impl LanguageProfile {
    /// No variants, stopwords or folds; safe for any language.
    pub fn neutral() -> Self {
        Self {
            name: "neutral".to_string(),
            ..Self::default()
        }
    }

    pub fn english() -> Self {
        Self {
            name: "english".to_string(),
            equivalent_words: pairs(&[("ok", "okay"), ("towards", "toward")]),
            stopwords: strings(&["the", "a", "an", "to"]),
            char_folds: Vec::new(),
        }
    }

    pub fn polish() -> Self {
        Self {
            name: "polish".to_string(),
            // Older editions spell the conjunction "i" as "y".
            equivalent_words: pairs(&[("i", "y"), ("iż", "że")]),
            stopwords: strings(&["i", "w", "z", "na", "się"]),
            char_folds: vec![
                ('ą', 'a'),
                ('ć', 'c'),
                ('ę', 'e'),
                ('ł', 'l'),
                ('ń', 'n'),
                ('ó', 'o'),
                ('ś', 's'),
                ('ź', 'z'),
                ('ż', 'z'),
            ],
        }
    }

    pub fn russian() -> Self {
        Self {
            name: "russian".to_string(),
            equivalent_words: Vec::new(),
            stopwords: strings(&["и", "в", "не", "на"]),
            char_folds: vec![('ё', 'е')],
        }
    }

    /// Resolves a built-in profile by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "neutral" => Some(Self::neutral()),
            "english" | "en" => Some(Self::english()),
            "polish" | "pl" => Some(Self::polish()),
            "russian" | "ru" => Some(Self::russian()),
            _ => None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read language profile", e))?;
        serde_json::from_str(&data).map_err(|e| AlignmentError::json("parse language profile", e))
    }
}

/// Both aligner configurations, as read by the report binary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentProfile {
    pub transcript: TranscriptAlignerConfig,
    pub bilingual: BilingualAlignerConfig,
}

impl AlignmentProfile {
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read alignment profile", e))?;
        serde_json::from_str(&data).map_err(|e| AlignmentError::json("parse alignment profile", e))
    }
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
