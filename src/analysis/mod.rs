//! Deterministic text statistics: tokenization, counts and averages, word frequencies.

pub mod frequency;
pub mod statistics;
pub mod tokenize;

pub use frequency::{FrequencyTable, TOP_WORDS_LIMIT, WordCount, top_words};
pub use statistics::{StatisticsError, TextStatistics};
pub use tokenize::{Tokens, tokenize};
