use std::path::{Path, PathBuf};

use crate::alignment::token_cache::TokenCache;
use crate::config::{BilingualAlignerConfig, LanguageProfile, TranscriptAlignerConfig};
use crate::error::AlignmentError;
use crate::pipeline::defaults::{FuzzyWordComparator, LexicalOverlapMatcher};
use crate::pipeline::runtime::{
    BilingualAligner, BilingualAlignerParts, TranscriptAligner, TranscriptAlignerParts,
};
use crate::pipeline::traits::{OverlapMatcher, WordComparator};

/// Where a language profile comes from when none is injected directly.
enum ProfileSource {
    Default,
    Inline(LanguageProfile),
    File(PathBuf),
}

impl ProfileSource {
    fn resolve(self) -> Result<LanguageProfile, AlignmentError> {
        match self {
            Self::Default => Ok(LanguageProfile::english()),
            Self::Inline(profile) => Ok(profile),
            Self::File(path) => LanguageProfile::load(&path),
        }
    }
}

pub struct TranscriptAlignerBuilder {
    config: TranscriptAlignerConfig,
    profile: ProfileSource,
    comparator: Option<Box<dyn WordComparator>>,
}

impl TranscriptAlignerBuilder {
    pub fn new(config: TranscriptAlignerConfig) -> Self {
        Self {
            config,
            profile: ProfileSource::Default,
            comparator: None,
        }
    }

    pub fn with_profile(mut self, profile: LanguageProfile) -> Self {
        self.profile = ProfileSource::Inline(profile);
        self
    }

    pub fn with_profile_path(mut self, path: impl AsRef<Path>) -> Self {
        self.profile = ProfileSource::File(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the profile-driven comparator entirely.
    pub fn with_word_comparator(mut self, comparator: Box<dyn WordComparator>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn build(self) -> Result<TranscriptAligner, AlignmentError> {
        let comparator = match self.comparator {
            Some(comparator) => comparator,
            None => Box::new(FuzzyWordComparator::new(&self.profile.resolve()?)),
        };
        Ok(TranscriptAligner::from_parts(TranscriptAlignerParts {
            config: self.config,
            comparator,
        }))
    }
}

/// Per-language wiring of the bilingual aligner.
struct LanguageSide {
    profile: ProfileSource,
    cache: Option<Box<dyn TokenCache>>,
    matcher: Option<Box<dyn OverlapMatcher>>,
}

impl LanguageSide {
    fn new() -> Self {
        Self {
            profile: ProfileSource::Inline(LanguageProfile::neutral()),
            cache: None,
            matcher: None,
        }
    }

    fn build(self, config: &BilingualAlignerConfig) -> Result<Box<dyn OverlapMatcher>, AlignmentError> {
        if let Some(matcher) = self.matcher {
            return Ok(matcher);
        }
        let profile = self.profile.resolve()?;
        Ok(match self.cache {
            Some(cache) => Box::new(LexicalOverlapMatcher::with_cache(&profile, config, cache)),
            None => Box::new(LexicalOverlapMatcher::new(&profile, config)),
        })
    }
}

pub struct BilingualAlignerBuilder {
    config: BilingualAlignerConfig,
    primary: LanguageSide,
    secondary: LanguageSide,
}

impl BilingualAlignerBuilder {
    pub fn new(config: BilingualAlignerConfig) -> Self {
        Self {
            config,
            primary: LanguageSide::new(),
            secondary: LanguageSide::new(),
        }
    }

    pub fn with_primary_profile(mut self, profile: LanguageProfile) -> Self {
        self.primary.profile = ProfileSource::Inline(profile);
        self
    }

    pub fn with_secondary_profile(mut self, profile: LanguageProfile) -> Self {
        self.secondary.profile = ProfileSource::Inline(profile);
        self
    }

    pub fn with_primary_profile_path(mut self, path: impl AsRef<Path>) -> Self {
        self.primary.profile = ProfileSource::File(path.as_ref().to_path_buf());
        self
    }

    pub fn with_secondary_profile_path(mut self, path: impl AsRef<Path>) -> Self {
        self.secondary.profile = ProfileSource::File(path.as_ref().to_path_buf());
        self
    }

    pub fn with_primary_cache(mut self, cache: Box<dyn TokenCache>) -> Self {
        self.primary.cache = Some(cache);
        self
    }

    pub fn with_secondary_cache(mut self, cache: Box<dyn TokenCache>) -> Self {
        self.secondary.cache = Some(cache);
        self
    }

    pub fn with_primary_matcher(mut self, matcher: Box<dyn OverlapMatcher>) -> Self {
        self.primary.matcher = Some(matcher);
        self
    }

    pub fn with_secondary_matcher(mut self, matcher: Box<dyn OverlapMatcher>) -> Self {
        self.secondary.matcher = Some(matcher);
        self
    }

    pub fn build(self) -> Result<BilingualAligner, AlignmentError> {
        let primary = self.primary.build(&self.config)?;
        let secondary = self.secondary.build(&self.config)?;
        Ok(BilingualAligner::from_parts(BilingualAlignerParts {
            config: self.config,
            primary,
            secondary,
        }))
    }
}
