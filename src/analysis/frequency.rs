//! Word frequency table and top-N ranking.

use serde::Serialize;
use std::collections::HashMap;

/// Number of entries reported in the "most frequent words" section.
pub const TOP_WORDS_LIMIT: usize = 10;

/// A word with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    /// The normalized word.
    pub word: String,
    /// Number of occurrences in the document.
    pub count: usize,
}

/// Occurrence counts keyed by word, remembering first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<WordCount>,
    positions: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Count every word in the sequence.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let mut table = Self::default();
        for word in words {
            table.record(word.as_ref());
        }
        table
    }

    fn record(&mut self, word: &str) {
        if let Some(&position) = self.positions.get(word) {
            self.entries[position].count += 1;
            return;
        }
        self.positions.insert(word.to_string(), self.entries.len());
        self.entries.push(WordCount {
            word: word.to_string(),
            count: 1,
        });
    }

    /// Occurrence count for a word, if it appeared.
    pub fn get(&self, word: &str) -> Option<usize> {
        self.positions
            .get(word)
            .map(|&position| self.entries[position].count)
    }

    /// Sum of all counts, equal to the length of the counted sequence.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// The `limit` most frequent words, by count descending; ties keep first-occurrence order.
    pub fn top(&self, limit: usize) -> Vec<WordCount> {
        let mut ranked = self.entries.clone();
        // `sort_by` is stable, so equal counts stay in first-occurrence order.
        ranked.sort_by(|left, right| right.count.cmp(&left.count));
        ranked.truncate(limit);
        ranked
    }
}

/// Rank the most frequent words of a sequence.
pub fn top_words<S: AsRef<str>>(words: &[S]) -> Vec<WordCount> {
    FrequencyTable::from_words(words).top(TOP_WORDS_LIMIT)
}
