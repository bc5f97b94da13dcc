use std::path::Path;

use crate::error::AlignmentError;
use crate::types::TranslatedSentence;

/// One edition of a book: human-written sentences paired line by line with
/// their machine translation into the other language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParallelCorpus {
    entries: Vec<TranslatedSentence>,
}

impl ParallelCorpus {
    pub fn new(entries: Vec<TranslatedSentence>) -> Self {
        Self { entries }
    }

    /// Pairs the i-th line of `originals` with the i-th line of `translations`.
    ///
    /// Lines blank on both sides (paragraph separators) are dropped; a line
    /// blank on only one side is rejected.
    pub fn from_texts(originals: &str, translations: &str) -> Result<Self, AlignmentError> {
        let originals: Vec<&str> = originals.lines().collect();
        let translations: Vec<&str> = translations.lines().collect();
        if originals.len() != translations.len() {
            return Err(AlignmentError::CorpusLengthMismatch {
                originals: originals.len(),
                translations: translations.len(),
            });
        }
        let mut entries = Vec::with_capacity(originals.len());
        for (idx, (original, translation)) in originals.into_iter().zip(translations).enumerate() {
            let (original, translation) = (original.trim(), translation.trim());
            match (original.is_empty(), translation.is_empty()) {
                (true, true) => continue,
                (false, false) => entries.push(TranslatedSentence::new(original, translation)),
                (true, false) | (false, true) => {
                    return Err(AlignmentError::invalid_input(format!(
                        "corpus line {} is blank on only one side",
                        idx + 1
                    )));
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn load(originals_path: &Path, translations_path: &Path) -> Result<Self, AlignmentError> {
        let originals = std::fs::read_to_string(originals_path)
            .map_err(|e| AlignmentError::io("read corpus originals", e))?;
        let translations = std::fs::read_to_string(translations_path)
            .map_err(|e| AlignmentError::io("read corpus translations", e))?;
        let corpus = Self::from_texts(&originals, &translations)?;
        tracing::debug!(
            originals = %originals_path.display(),
            entries = corpus.len(),
            "corpus: loaded"
        );
        Ok(corpus)
    }

    pub fn entries(&self) -> &[TranslatedSentence] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
