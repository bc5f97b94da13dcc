pub mod bilingual;
pub mod edit_distance;
pub mod lexical_overlap;
pub mod report;
pub mod token_cache;
pub mod transcript;
pub mod word_equality;
