use rayon::prelude::*;

use crate::alignment::bilingual::{align_corpora, LanguageMatchers};
use crate::alignment::transcript::align_sentences;
use crate::config::{BilingualAlignerConfig, TranscriptAlignerConfig};
use crate::corpus::ParallelCorpus;
use crate::pipeline::traits::{OverlapMatcher, WordComparator};
use crate::types::{
    BilingualSentenceMatchingResult, Chapter, Sentence, SentenceWithSound, Transcript,
    TranslatedSentence,
};

pub struct TranscriptAligner {
    config: TranscriptAlignerConfig,
    comparator: Box<dyn WordComparator>,
}

pub(crate) struct TranscriptAlignerParts {
    pub config: TranscriptAlignerConfig,
    pub comparator: Box<dyn WordComparator>,
}

impl TranscriptAligner {
    pub(crate) fn from_parts(parts: TranscriptAlignerParts) -> Self {
        Self {
            config: parts.config,
            comparator: parts.comparator,
        }
    }

    pub fn config(&self) -> &TranscriptAlignerConfig {
        &self.config
    }

    /// Sentences with a confident match in `transcript`, in book order.
    pub fn align(&self, sentences: &[Sentence], transcript: &Transcript) -> Vec<SentenceWithSound> {
        if sentences.is_empty() || transcript.is_empty() {
            return Vec::new();
        }
        align_sentences(sentences, transcript, self.comparator.as_ref(), &self.config)
    }

    /// Aligns independent chapters in parallel; output order follows `chapters`.
    pub fn align_chapters(&self, chapters: &[Chapter]) -> Vec<Vec<SentenceWithSound>> {
        chapters
            .par_iter()
            .map(|chapter| self.align(&chapter.sentences, &chapter.transcript))
            .collect()
    }
}

pub struct BilingualAligner {
    config: BilingualAlignerConfig,
    primary: Box<dyn OverlapMatcher>,
    secondary: Box<dyn OverlapMatcher>,
}

pub(crate) struct BilingualAlignerParts {
    pub config: BilingualAlignerConfig,
    pub primary: Box<dyn OverlapMatcher>,
    pub secondary: Box<dyn OverlapMatcher>,
}

impl BilingualAligner {
    pub(crate) fn from_parts(parts: BilingualAlignerParts) -> Self {
        Self {
            config: parts.config,
            primary: parts.primary,
            secondary: parts.secondary,
        }
    }

    pub fn config(&self) -> &BilingualAlignerConfig {
        &self.config
    }

    /// `primary` holds originals in language A with translations to B;
    /// `secondary` holds originals in B with translations to A.
    pub fn align(
        &self,
        primary: &[TranslatedSentence],
        secondary: &[TranslatedSentence],
    ) -> BilingualSentenceMatchingResult {
        let matchers = LanguageMatchers {
            primary: self.primary.as_ref(),
            secondary: self.secondary.as_ref(),
        };
        align_corpora(primary, secondary, &matchers, &self.config)
    }

    pub fn align_corpora(
        &self,
        primary: &ParallelCorpus,
        secondary: &ParallelCorpus,
    ) -> BilingualSentenceMatchingResult {
        self.align(primary.entries(), secondary.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::builder::{BilingualAlignerBuilder, TranscriptAlignerBuilder};
    use crate::types::TranscriptWord;

    fn transcript(path: &str, text: &str) -> Transcript {
        let words = text
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| TranscriptWord::new(w, i as f64, i as f64 + 0.5))
            .collect();
        Transcript::new(path, words).expect("valid transcript")
    }

    fn sentence(text: &str) -> Sentence {
        Sentence::new(text, text.split_whitespace().map(str::to_string).collect())
    }

    #[test]
    fn align_short_circuits_on_empty_inputs() {
        let aligner = TranscriptAlignerBuilder::new(TranscriptAlignerConfig::default())
            .build()
            .expect("build");
        let empty = Transcript::new("x.mp3", Vec::new()).expect("empty transcript");
        assert!(aligner.align(&[sentence("hello there")], &empty).is_empty());
        assert!(aligner
            .align(&[], &transcript("x.mp3", "hello there"))
            .is_empty());
    }

    #[test]
    fn align_chapters_keeps_chapter_order() {
        let aligner = TranscriptAlignerBuilder::new(TranscriptAlignerConfig::default())
            .build()
            .expect("build");
        let chapters = vec![
            Chapter {
                sentences: vec![sentence("first chapter opens")],
                transcript: transcript("one.mp3", "first chapter opens"),
            },
            Chapter {
                sentences: vec![sentence("second chapter follows")],
                transcript: transcript("two.mp3", "zzzz second chapter follows"),
            },
        ];
        let out = aligner.align_chapters(&chapters);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0][0].audio_path, std::path::PathBuf::from("one.mp3"));
        assert_eq!(out[1][0].audio_path, std::path::PathBuf::from("two.mp3"));
        assert_eq!(out[1][0].first_word_index, 1);
    }

    #[test]
    fn bilingual_align_corpora_uses_entries() {
        let aligner = BilingualAlignerBuilder::new(BilingualAlignerConfig::default())
            .build()
            .expect("build");
        let primary = ParallelCorpus::from_texts("Hello\n", "Cześć\n").expect("corpus");
        let secondary = ParallelCorpus::from_texts("Cześć\n", "Hi\n").expect("corpus");
        let result = aligner.align_corpora(&primary, &secondary);
        assert_eq!(result.secondary_for("Hello"), Some("Cześć"));
    }
}
