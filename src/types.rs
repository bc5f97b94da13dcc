use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

/// A book sentence as produced by the external tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub words: Vec<String>,
    /// Text of the preceding sentence, if the caller linked context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Sentence {
    pub fn new(text: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            text: text.into(),
            words,
            previous: None,
            next: None,
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Fills `previous`/`next` of every sentence from its neighbours in book order.
    pub fn link_neighbours(sentences: &mut [Sentence]) {
        let texts: Vec<String> = sentences.iter().map(|s| s.text.clone()).collect();
        for (i, sentence) in sentences.iter_mut().enumerate() {
            sentence.previous = i.checked_sub(1).map(|p| texts[p].clone());
            sentence.next = texts.get(i + 1).cloned();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    /// Seconds from the start of the audio file.
    pub start: f64,
    pub end: f64,
}

impl TranscriptWord {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

/// Recognized words for one audio file, ordered by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TranscriptRecord")]
pub struct Transcript {
    audio_path: PathBuf,
    words: Vec<TranscriptWord>,
}

#[derive(Deserialize)]
struct TranscriptRecord {
    audio_path: PathBuf,
    words: Vec<TranscriptWord>,
}

impl TryFrom<TranscriptRecord> for Transcript {
    type Error = AlignmentError;

    fn try_from(record: TranscriptRecord) -> Result<Self, Self::Error> {
        Transcript::new(record.audio_path, record.words)
    }
}

impl Transcript {
    pub fn new(
        audio_path: impl Into<PathBuf>,
        words: Vec<TranscriptWord>,
    ) -> Result<Self, AlignmentError> {
        let mut prev_start = 0.0f64;
        for (idx, w) in words.iter().enumerate() {
            if !w.start.is_finite() || !w.end.is_finite() || w.start < 0.0 {
                return Err(AlignmentError::invalid_input(format!(
                    "transcript word {idx} ('{}') has an invalid timestamp",
                    w.word
                )));
            }
            if w.end < w.start {
                return Err(AlignmentError::invalid_input(format!(
                    "transcript word {idx} ('{}') ends before it starts: {} < {}",
                    w.word, w.end, w.start
                )));
            }
            if w.start < prev_start {
                return Err(AlignmentError::invalid_input(format!(
                    "transcript word {idx} ('{}') starts before its predecessor",
                    w.word
                )));
            }
            prev_start = w.start;
        }
        Ok(Self {
            audio_path: audio_path.into(),
            words,
        })
    }

    pub fn from_json(data: &str) -> Result<Self, AlignmentError> {
        serde_json::from_str(data).map_err(|e| AlignmentError::json("parse transcript", e))
    }

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| AlignmentError::io("read transcript", e))?;
        Self::from_json(&data)
    }

    pub fn audio_path(&self) -> &Path {
        &self.audio_path
    }

    pub fn words(&self) -> &[TranscriptWord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Sentences of one chapter and the transcript of its audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub sentences: Vec<Sentence>,
    pub transcript: Transcript,
}

/// A sentence together with the transcript words it was matched to.
///
/// `first_word_index..=last_word_index` always lies inside the transcript, and
/// the span covers at least as many words as the sentence has (skip-recovery
/// can only widen it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceWithSound {
    pub sentence: Sentence,
    pub first_word_index: usize,
    pub last_word_index: usize,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub audio_path: PathBuf,
}

impl SentenceWithSound {
    pub fn span_len(&self) -> usize {
        self.last_word_index - self.first_word_index + 1
    }

    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// One corpus entry: a human-written original and its machine translation
/// into the other language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedSentence {
    pub original: String,
    pub translation: String,
}

impl TranslatedSentence {
    pub fn new(original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translation: translation.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BilingualSentenceRecord")]
pub struct BilingualSentence {
    primary: String,
    secondary: String,
}

#[derive(Deserialize)]
struct BilingualSentenceRecord {
    primary: String,
    secondary: String,
}

impl TryFrom<BilingualSentenceRecord> for BilingualSentence {
    type Error = AlignmentError;

    fn try_from(record: BilingualSentenceRecord) -> Result<Self, Self::Error> {
        BilingualSentence::new(record.primary, record.secondary)
    }
}

impl BilingualSentence {
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
    ) -> Result<Self, AlignmentError> {
        let primary = primary.into();
        let secondary = secondary.into();
        if primary.trim().is_empty() {
            return Err(AlignmentError::EmptyBilingualSide { side: "primary" });
        }
        if secondary.trim().is_empty() {
            return Err(AlignmentError::EmptyBilingualSide { side: "secondary" });
        }
        Ok(Self { primary, secondary })
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> &str {
        &self.secondary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MatchingResultRecord")]
pub struct BilingualSentenceMatchingResult {
    sentences: Vec<BilingualSentence>,
    /// Percentage of primary sentences that found a partner, in [0, 100].
    success_rate: f64,
    #[serde(skip)]
    by_primary: HashMap<String, usize>,
    #[serde(skip)]
    by_secondary: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct MatchingResultRecord {
    sentences: Vec<BilingualSentence>,
    success_rate: f64,
}

impl From<MatchingResultRecord> for BilingualSentenceMatchingResult {
    fn from(record: MatchingResultRecord) -> Self {
        Self::with_rate(record.sentences, record.success_rate)
    }
}

impl BilingualSentenceMatchingResult {
    pub fn new(sentences: Vec<BilingualSentence>, total_primary: usize) -> Self {
        let success_rate = if total_primary == 0 {
            0.0
        } else {
            sentences.len() as f64 / total_primary as f64 * 100.0
        };
        Self::with_rate(sentences, success_rate)
    }

    fn with_rate(sentences: Vec<BilingualSentence>, success_rate: f64) -> Self {
        let mut by_primary = HashMap::with_capacity(sentences.len());
        let mut by_secondary = HashMap::with_capacity(sentences.len());
        // First occurrence wins for repeated sentences.
        for (idx, s) in sentences.iter().enumerate() {
            by_primary.entry(s.primary.clone()).or_insert(idx);
            by_secondary.entry(s.secondary.clone()).or_insert(idx);
        }
        Self {
            sentences,
            success_rate: success_rate.clamp(0.0, 100.0),
            by_primary,
            by_secondary,
        }
    }

    pub fn sentences(&self) -> &[BilingualSentence] {
        &self.sentences
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn secondary_for(&self, primary: &str) -> Option<&str> {
        self.by_primary
            .get(primary)
            .map(|&idx| self.sentences[idx].secondary())
    }

    pub fn primary_for(&self, secondary: &str) -> Option<&str> {
        self.by_secondary
            .get(secondary)
            .map(|&idx| self.sentences[idx].primary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn link_neighbours_sets_context_in_order() {
        let mut sentences = vec![
            Sentence::new("One.", words(&["One"])),
            Sentence::new("Two.", words(&["Two"])),
            Sentence::new("Three.", words(&["Three"])),
        ];
        Sentence::link_neighbours(&mut sentences);
        assert_eq!(sentences[0].previous, None);
        assert_eq!(sentences[0].next.as_deref(), Some("Two."));
        assert_eq!(sentences[1].previous.as_deref(), Some("One."));
        assert_eq!(sentences[1].next.as_deref(), Some("Three."));
        assert_eq!(sentences[2].next, None);
    }

    #[test]
    fn transcript_rejects_end_before_start() {
        let result = Transcript::new("a.mp3", vec![TranscriptWord::new("x", 2.0, 1.0)]);
        assert!(matches!(result, Err(AlignmentError::InvalidInput { .. })));
    }

    #[test]
    fn transcript_rejects_decreasing_starts() {
        let result = Transcript::new(
            "a.mp3",
            vec![
                TranscriptWord::new("x", 2.0, 3.0),
                TranscriptWord::new("y", 1.0, 3.5),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn transcript_rejects_negative_and_nan() {
        assert!(Transcript::new("a.mp3", vec![TranscriptWord::new("x", -1.0, 1.0)]).is_err());
        assert!(Transcript::new("a.mp3", vec![TranscriptWord::new("x", 0.0, f64::NAN)]).is_err());
    }

    #[test]
    fn transcript_from_json_validates() {
        let ok = r#"{"audio_path":"book.mp3","words":[{"word":"Hello","start":0.0,"end":1.0}]}"#;
        let transcript = Transcript::from_json(ok).expect("valid transcript");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.audio_path(), Path::new("book.mp3"));

        let bad = r#"{"audio_path":"book.mp3","words":[{"word":"Hello","start":3.0,"end":1.0}]}"#;
        assert!(Transcript::from_json(bad).is_err());
    }

    #[test]
    fn bilingual_sentence_rejects_blank_sides() {
        assert!(matches!(
            BilingualSentence::new("  ", "Cześć"),
            Err(AlignmentError::EmptyBilingualSide { side: "primary" })
        ));
        assert!(matches!(
            BilingualSentence::new("Hello", ""),
            Err(AlignmentError::EmptyBilingualSide { side: "secondary" })
        ));
        assert!(BilingualSentence::new("Hello", "Cześć").is_ok());
    }

    #[test]
    fn bilingual_sentence_deserialize_validates() {
        let bad = r#"{"primary":"Hello","secondary":"\t"}"#;
        assert!(serde_json::from_str::<BilingualSentence>(bad).is_err());
    }

    #[test]
    fn matching_result_rate_and_lookups() {
        let pairs = vec![
            BilingualSentence::new("Hello", "Cześć").unwrap(),
            BilingualSentence::new("Good night", "Dobranoc").unwrap(),
        ];
        let result = BilingualSentenceMatchingResult::new(pairs, 8);
        assert!((result.success_rate() - 25.0).abs() < 1e-9);
        assert_eq!(result.secondary_for("Hello"), Some("Cześć"));
        assert_eq!(result.primary_for("Dobranoc"), Some("Good night"));
        assert_eq!(result.secondary_for("Missing"), None);
    }

    #[test]
    fn matching_result_empty_corpus_has_zero_rate() {
        let result = BilingualSentenceMatchingResult::new(Vec::new(), 0);
        assert_eq!(result.success_rate(), 0.0);
        assert!(result.is_empty());
    }

    #[test]
    fn matching_result_rebuilds_indexes_after_deserialize() {
        let pairs = vec![BilingualSentence::new("Hello", "Cześć").unwrap()];
        let result = BilingualSentenceMatchingResult::new(pairs, 1);
        let json = serde_json::to_string(&result).expect("serialize");
        let restored: BilingualSentenceMatchingResult =
            serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.primary_for("Cześć"), Some("Hello"));
        assert!((restored.success_rate() - 100.0).abs() < 1e-9);
    }
}
