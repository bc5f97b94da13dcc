use serde::Serialize;

use crate::alignment::bilingual::LOW_SUCCESS_RATE;
use crate::types::{BilingualSentence, BilingualSentenceMatchingResult, Sentence, SentenceWithSound};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<TranscriptReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bilingual: Option<BilingualReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub command: String,
    pub case_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptReport {
    pub chapters: Vec<ChapterReport>,
    pub aggregate: TranscriptAggregate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterReport {
    pub id: String,
    pub audio_path: String,
    pub sentence_count: u32,
    pub matched_count: u32,
    pub match_ratio: f32,
    /// Matches whose span is longer than the sentence (skip-recovery used).
    pub widened_span_count: u32,
    pub matched_audio_seconds: f64,
    pub matches: Vec<SentenceWithSound>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct TranscriptAggregate {
    pub chapter_count: u32,
    pub sentence_count: u32,
    pub matched_count: u32,
    pub match_ratio: f32,
    pub widened_span_count: u32,
    pub matched_audio_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BilingualReport {
    pub primary_count: u32,
    pub secondary_count: u32,
    pub matched_count: u32,
    pub success_rate: f64,
    pub pairs: Vec<BilingualSentence>,
    pub notes: Vec<String>,
}

pub fn compute_chapter_report(
    id: &str,
    audio_path: &str,
    sentences: &[Sentence],
    matches: Vec<SentenceWithSound>,
) -> ChapterReport {
    let mut notes = Vec::new();
    if matches.is_empty() {
        notes.push("no_matches".to_string());
    }
    let dropped = sentences.len().saturating_sub(matches.len());
    if dropped > 0 {
        notes.push(format!("sentences_dropped={dropped}"));
    }
    let empty_sentences = sentences.iter().filter(|s| s.words.is_empty()).count();
    if empty_sentences > 0 {
        notes.push(format!("zero_word_sentences={empty_sentences}"));
    }

    let widened_span_count = matches
        .iter()
        .filter(|m| m.span_len() > m.sentence.word_count())
        .count();
    let matched_audio_seconds = matches.iter().map(SentenceWithSound::duration_seconds).sum();

    ChapterReport {
        id: id.to_string(),
        audio_path: audio_path.to_string(),
        sentence_count: to_u32(sentences.len()),
        matched_count: to_u32(matches.len()),
        match_ratio: ratio(matches.len(), sentences.len()),
        widened_span_count: to_u32(widened_span_count),
        matched_audio_seconds,
        matches,
        notes,
    }
}

pub fn aggregate_chapters(chapters: &[ChapterReport]) -> TranscriptAggregate {
    let sentence_count: u32 = chapters.iter().map(|c| c.sentence_count).sum();
    let matched_count: u32 = chapters.iter().map(|c| c.matched_count).sum();
    TranscriptAggregate {
        chapter_count: to_u32(chapters.len()),
        sentence_count,
        matched_count,
        match_ratio: ratio(matched_count as usize, sentence_count as usize),
        widened_span_count: chapters.iter().map(|c| c.widened_span_count).sum(),
        matched_audio_seconds: chapters.iter().map(|c| c.matched_audio_seconds).sum(),
    }
}

pub fn compute_bilingual_report(
    primary_count: usize,
    secondary_count: usize,
    result: &BilingualSentenceMatchingResult,
) -> BilingualReport {
    let mut notes = Vec::new();
    if primary_count == 0 {
        notes.push("empty_primary_corpus".to_string());
    }
    if secondary_count == 0 {
        notes.push("empty_secondary_corpus".to_string());
    }
    if primary_count > 0 && result.success_rate() < LOW_SUCCESS_RATE {
        notes.push(format!("low_success_rate={:.1}", result.success_rate()));
    }
    BilingualReport {
        primary_count: to_u32(primary_count),
        secondary_count: to_u32(secondary_count),
        matched_count: to_u32(result.len()),
        success_rate: result.success_rate(),
        pairs: result.sentences().to_vec(),
        notes,
    }
}

fn ratio(part: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) as f32
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
