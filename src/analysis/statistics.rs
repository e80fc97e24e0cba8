//! Descriptive counts and averages derived from a tokenized document.

use super::tokenize::Tokens;
use serde::Serialize;
use thiserror::Error;

/// Raised when an average has nothing to divide by.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsError {
    /// The document produced no words.
    #[error("cannot average word length: document contains no words")]
    NoWords,
    /// The document produced no sentences.
    #[error("cannot average sentence length: document contains no sentences")]
    NoSentences,
}

/// Scalar statistics reported for a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStatistics {
    /// Byte length of the original, pre-normalization content.
    pub total_characters: usize,
    /// Number of word tokens.
    pub total_words: usize,
    /// Number of newline-delimited lines in the original content.
    pub total_lines: usize,
    /// Number of sentence segments.
    pub total_sentences: usize,
    /// Mean word length in bytes (`0.0` when there are no words).
    pub average_word_length: f64,
    /// Mean words per sentence (`0.0` when there are no sentences).
    pub average_sentence_length: f64,
}

impl TextStatistics {
    /// Compute statistics, substituting `0.0` for averages over empty input.
    ///
    /// Returns the statistics together with any averages that degraded.
    pub fn compute(raw: &[u8], tokens: &Tokens) -> (Self, Vec<StatisticsError>) {
        let mut degraded = Vec::new();
        let mut or_zero = |value: Result<f64, StatisticsError>| {
            value.unwrap_or_else(|error| {
                degraded.push(error);
                0.0
            })
        };

        let average_word_length = or_zero(average_word_length(&tokens.words));
        let average_sentence_length =
            or_zero(average_sentence_length(&tokens.words, &tokens.sentences));

        let statistics = Self {
            total_characters: raw.len(),
            total_words: tokens.words.len(),
            total_lines: count_lines(raw),
            total_sentences: tokens.sentences.len(),
            average_word_length,
            average_sentence_length,
        };
        (statistics, degraded)
    }
}

/// Count lines the way a line-oriented file reader does: a final segment without a trailing
/// newline still counts, and empty content has no lines.
pub fn count_lines(raw: &[u8]) -> usize {
    let newlines = raw.iter().filter(|byte| **byte == b'\n').count();
    match raw.last() {
        Some(b'\n') | None => newlines,
        Some(_) => newlines + 1,
    }
}

/// Sum of word lengths divided by the number of words.
pub fn average_word_length(words: &[String]) -> Result<f64, StatisticsError> {
    if words.is_empty() {
        return Err(StatisticsError::NoWords);
    }
    let letters: usize = words.iter().map(String::len).sum();
    Ok(letters as f64 / words.len() as f64)
}

/// Number of words divided by the number of sentences.
pub fn average_sentence_length(
    words: &[String],
    sentences: &[String],
) -> Result<f64, StatisticsError> {
    if sentences.is_empty() {
        return Err(StatisticsError::NoSentences);
    }
    Ok(words.len() as f64 / sentences.len() as f64)
}
