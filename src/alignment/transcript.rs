use std::ops::RangeInclusive;

use crate::config::TranscriptAlignerConfig;
use crate::pipeline::traits::WordComparator;
use crate::types::{Sentence, SentenceWithSound, Transcript, TranscriptWord};

/// Forward cursor of the sentence-to-transcript scan.
///
/// `cursor` only ever grows: every accepted span starts strictly after the
/// previous one, which keeps results in book order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranscriptScanState {
    /// Transcript index where the last accepted span started.
    pub cursor: usize,
    /// Sentence words consumed by that span, at least 1 once anything matched.
    pub consumed: usize,
}

impl TranscriptScanState {
    /// Where the next sentence is expected to begin.
    pub fn expected_start(&self) -> usize {
        self.cursor + self.consumed
    }

    /// Candidate start positions for a sentence of `word_count` words.
    pub fn candidate_range(
        &self,
        word_count: usize,
        transcript_len: usize,
        config: &TranscriptAlignerConfig,
    ) -> Option<RangeInclusive<usize>> {
        let last = transcript_len.checked_sub(1)?;
        let expected = self.expected_start();
        let floor = if self.consumed == 0 {
            self.cursor
        } else {
            self.cursor + 1
        };
        let lo = expected.saturating_sub(config.look_back).max(floor);
        let hi = expected
            .saturating_add(config.ahead_window(word_count))
            .min(last);
        (lo <= hi).then_some(lo..=hi)
    }

    pub fn after_match(self, span_start: usize, word_count: usize) -> Self {
        Self {
            cursor: span_start.max(self.cursor),
            consumed: word_count.max(1),
        }
    }
}

/// Transcript words consumed by one sentence at one candidate start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanMatch {
    pub first_index: usize,
    pub last_index: usize,
    pub skip_recoveries: usize,
}

/// Tries to consume every word of `words` starting at transcript index `start`.
///
/// A middle word that does not match may be a recognizer split or an inserted
/// word: if the following sentence word matches two transcript words ahead,
/// the scan jumps there. First and last words must match exactly where they
/// fall.
pub fn match_at<C: WordComparator + ?Sized>(
    words: &[String],
    transcript: &[TranscriptWord],
    start: usize,
    comparator: &C,
    max_skip_recoveries: usize,
) -> Option<SpanMatch> {
    let last_word = words.len().checked_sub(1)?;
    let mut i = 0usize;
    let mut t = start;
    let mut skips = 0usize;

    while i <= last_word {
        let heard = transcript.get(t)?;
        if comparator.are_equivalent(&words[i], &heard.word) {
            i += 1;
            t += 1;
            continue;
        }
        if i == 0 || i == last_word || skips >= max_skip_recoveries {
            return None;
        }
        let ahead = transcript.get(t + 2)?;
        if !comparator.are_equivalent(&words[i + 1], &ahead.word) {
            return None;
        }
        tracing::debug!(
            sentence_word = words[i].as_str(),
            transcript_word = heard.word.as_str(),
            transcript_index = t,
            "transcript scan: skip-recovery"
        );
        skips += 1;
        i += 2;
        t += 3;
    }

    Some(SpanMatch {
        first_index: start,
        last_index: t - 1,
        skip_recoveries: skips,
    })
}

/// One step of the scan: locate `sentence` and advance the state.
///
/// The first candidate in the window that matches wins, even if a later one
/// would match with fewer skip-recoveries.
pub fn scan_sentence<C: WordComparator + ?Sized>(
    state: TranscriptScanState,
    sentence: &Sentence,
    transcript: &Transcript,
    comparator: &C,
    config: &TranscriptAlignerConfig,
) -> (TranscriptScanState, Option<SentenceWithSound>) {
    let word_count = sentence.word_count();
    if word_count == 0 {
        return (state, None);
    }
    let Some(range) = state.candidate_range(word_count, transcript.len(), config) else {
        return (state, None);
    };

    let words = transcript.words();
    let found = range.into_iter().find_map(|start| {
        match_at(
            &sentence.words,
            words,
            start,
            comparator,
            config.max_skip_recoveries,
        )
    });

    match found {
        Some(span) => {
            tracing::debug!(
                first_index = span.first_index,
                last_index = span.last_index,
                skip_recoveries = span.skip_recoveries,
                sentence = sentence.text.as_str(),
                "transcript scan: sentence matched"
            );
            let matched = SentenceWithSound {
                sentence: sentence.clone(),
                first_word_index: span.first_index,
                last_word_index: span.last_index,
                start_seconds: words[span.first_index].start,
                end_seconds: words[span.last_index].end,
                audio_path: transcript.audio_path().to_path_buf(),
            };
            (state.after_match(span.first_index, word_count), Some(matched))
        }
        None => (state, None),
    }
}

/// Maps sentences onto `transcript`, dropping those without a confident match.
pub fn align_sentences<C: WordComparator + ?Sized>(
    sentences: &[Sentence],
    transcript: &Transcript,
    comparator: &C,
    config: &TranscriptAlignerConfig,
) -> Vec<SentenceWithSound> {
    let (_, matched) = sentences.iter().fold(
        (TranscriptScanState::default(), Vec::new()),
        |(state, mut matched), sentence| {
            let (next, found) = scan_sentence(state, sentence, transcript, comparator, config);
            matched.extend(found);
            (next, matched)
        },
    );
    tracing::info!(
        audio = %transcript.audio_path().display(),
        sentences = sentences.len(),
        matched = matched.len(),
        transcript_words = transcript.len(),
        "transcript scan: finished"
    );
    matched
}
