//! The aggregate result record rendered into reports.

use crate::analysis::{TextStatistics, WordCount};
use crate::annotation::{Annotations, Entity};
use serde::Serialize;

/// Everything known about one analyzed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Byte length of the original content.
    pub total_characters: usize,
    /// Number of word tokens.
    pub total_words: usize,
    /// Number of lines in the original content.
    pub total_lines: usize,
    /// Number of sentence segments.
    pub total_sentences: usize,
    /// Mean word length, `0.0` for empty input.
    pub average_word_length: f64,
    /// Mean words per sentence, `0.0` for empty input.
    pub average_sentence_length: f64,
    /// Up to ten most frequent words, ranked.
    pub top_words: Vec<WordCount>,
    /// Entities in service order.
    pub entities: Vec<Entity>,
    /// Category labels in service order.
    pub categories: Vec<String>,
}

impl AnalysisResult {
    /// Merge statistics, ranked words and annotations into one record.
    pub fn assemble(
        statistics: TextStatistics,
        top_words: Vec<WordCount>,
        annotations: Annotations,
    ) -> Self {
        let TextStatistics {
            total_characters,
            total_words,
            total_lines,
            total_sentences,
            average_word_length,
            average_sentence_length,
        } = statistics;
        Self {
            total_characters,
            total_words,
            total_lines,
            total_sentences,
            average_word_length,
            average_sentence_length,
            top_words,
            entities: annotations.entities,
            categories: annotations.categories,
        }
    }

    /// Scalar statistics in report order, keyed by field name.
    pub fn scalars(&self) -> [(&'static str, Scalar); 6] {
        [
            ("total_characters", Scalar::Count(self.total_characters)),
            ("total_words", Scalar::Count(self.total_words)),
            ("total_lines", Scalar::Count(self.total_lines)),
            ("total_sentences", Scalar::Count(self.total_sentences)),
            (
                "average_word_length",
                Scalar::Average(self.average_word_length),
            ),
            (
                "average_sentence_length",
                Scalar::Average(self.average_sentence_length),
            ),
        ]
    }
}

/// A scalar statistic as rendered in the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Integer count, rendered unformatted.
    Count(usize),
    /// Average, rendered with two decimals, halves rounded away from zero.
    Average(f64),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(value) => write!(f, "{value}"),
            Self::Average(value) => {
                // `{:.2}` alone rounds exact halves to even: 2.125 would print as 2.12.
                let rounded = (value * 100.0).round() / 100.0;
                write!(f, "{rounded:.2}")
            }
        }
    }
}
