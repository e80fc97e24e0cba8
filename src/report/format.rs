//! Plain-text report rendering.
//!
//! Layout, in fixed order:
//!
//! ```text
//! File Analysis Report
//!
//! Total Characters: 29
//! ...
//! Average Sentence Length: 3.00
//!
//! Top 10 Most Frequent Words:
//! word: count
//!
//! Entities:
//! identifier (Type: type, Relevance: relevance, Confidence: confidence)
//!
//! Categories:
//! label
//! ```
//!
//! Words are HTML-escaped to match how they were historically displayed in the browser.

use super::types::AnalysisResult;
use std::fmt;

/// First line of every report.
pub const REPORT_TITLE: &str = "File Analysis Report";

/// Display adapter that renders an [`AnalysisResult`] as a report.
pub struct Report<'a>(pub &'a AnalysisResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "{REPORT_TITLE}")?;
        writeln!(f)?;
        for (field, value) in result.scalars() {
            writeln!(f, "{}: {value}", scalar_label(field))?;
        }

        writeln!(f)?;
        writeln!(f, "Top 10 Most Frequent Words:")?;
        for entry in &result.top_words {
            writeln!(f, "{}: {}", escape_html(&entry.word), entry.count)?;
        }

        writeln!(f)?;
        writeln!(f, "Entities:")?;
        for entity in &result.entities {
            writeln!(
                f,
                "{} (Type: {}, Relevance: {}, Confidence: {})",
                entity.identifier, entity.kind, entity.relevance, entity.confidence
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Categories:")?;
        for category in &result.categories {
            writeln!(f, "{category}")?;
        }
        Ok(())
    }
}

/// Render the report text for a result.
pub fn render_report(result: &AnalysisResult) -> String {
    Report(result).to_string()
}

/// Turn a field name such as `total_words` into the label `Total Words`.
pub fn scalar_label(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape the five HTML-special characters.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}
