pub mod alignment;
pub mod config;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::report::{
    aggregate_chapters, compute_bilingual_report, compute_chapter_report, BilingualReport,
    ChapterReport, Meta, Report, TranscriptAggregate, TranscriptReport, SCHEMA_VERSION,
};
pub use alignment::token_cache::{InMemoryTokenCache, NoTokenCache, TokenCache};
pub use config::{
    AlignmentProfile, BilingualAlignerConfig, LanguageProfile, TranscriptAlignerConfig,
};
pub use corpus::ParallelCorpus;
pub use error::AlignmentError;
pub use pipeline::builder::{BilingualAlignerBuilder, TranscriptAlignerBuilder};
pub use pipeline::runtime::{BilingualAligner, TranscriptAligner};
pub use pipeline::traits::{OverlapMatcher, WordComparator};
pub use types::{
    BilingualSentence, BilingualSentenceMatchingResult, Chapter, Sentence, SentenceWithSound,
    Transcript, TranscriptWord, TranslatedSentence,
};
