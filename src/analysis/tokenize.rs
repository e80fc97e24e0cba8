//! Normalization and word/sentence splitting.
//!
//! The rules are deliberately naive and byte oriented:
//!
//! - Normalization drops every byte that is not ASCII alphanumeric, `_`, or ASCII whitespace,
//!   then lowercases what remains. Non-ASCII bytes are dropped entirely.
//! - Words are the non-empty runs between whitespace in the normalized text.
//! - Sentences are split on `.`, `!` and `?` *before* punctuation is stripped, then each segment
//!   is normalized and trimmed. A period inside `3.14` therefore ends a sentence, and so do
//!   abbreviations and each dot of an ellipsis.

/// Output of the tokenizer for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tokens {
    /// Lowercased, punctuation-stripped text.
    pub normalized: String,
    /// Ordered, non-empty word tokens.
    pub words: Vec<String>,
    /// Ordered, non-empty normalized sentence segments.
    pub sentences: Vec<String>,
}

const SENTENCE_TERMINATORS: [u8; 3] = [b'.', b'!', b'?'];

/// Tokenize raw document bytes into normalized text, words and sentences.
pub fn tokenize(raw: &[u8]) -> Tokens {
    let normalized = normalize(raw);
    let words = split_words(&normalized);
    let sentences = split_sentences(raw);
    Tokens {
        normalized,
        words,
        sentences,
    }
}

/// Strip non-word, non-whitespace bytes and lowercase the remainder.
pub fn normalize(raw: &[u8]) -> String {
    raw.iter()
        .copied()
        .filter(|byte| is_word_byte(*byte) || is_space_byte(*byte))
        .map(|byte| char::from(byte.to_ascii_lowercase()))
        .collect()
}

/// Split normalized text on whitespace runs, discarding empty tokens.
pub fn split_words(normalized: &str) -> Vec<String> {
    normalized
        .split(|c: char| c.is_ascii() && is_space_byte(c as u8))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split raw text into normalized sentences on `.`, `!` and `?`.
pub fn split_sentences(raw: &[u8]) -> Vec<String> {
    raw.split(|byte| SENTENCE_TERMINATORS.contains(byte))
        .map(normalize)
        .filter_map(|segment| {
            let trimmed = segment.trim_matches(|c: char| c.is_ascii() && is_space_byte(c as u8));
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

// Includes vertical tab, which `u8::is_ascii_whitespace` does not.
fn is_space_byte(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_reference_sentence() {
        let tokens = tokenize(b"Hello, world! This is a test.");
        assert_eq!(tokens.normalized, "hello world this is a test");
        assert_eq!(
            tokens.words,
            vec!["hello", "world", "this", "is", "a", "test"]
        );
        assert_eq!(tokens.sentences, vec!["hello world", "this is a test"]);
    }

    #[test]
    fn normalize_drops_non_ascii_and_punctuation() {
        assert_eq!(normalize("Café-au_lait!\t42".as_bytes()), "cafau_lait\t42");
    }

    #[test]
    fn words_split_on_any_whitespace_run() {
        assert_eq!(
            split_words("one \t two\n\n three\x0bfour"),
            vec!["one", "two", "three", "four"]
        );
    }

    #[test]
    fn decimals_and_ellipses_end_sentences() {
        let tokens = tokenize(b"Pi is 3.14... Really?");
        assert_eq!(tokens.sentences, vec!["pi is 3", "14", "really"]);
    }

    #[test]
    fn whitespace_and_punctuation_only_input_is_empty() {
        let tokens = tokenize(b"  ... !?  \n");
        assert!(tokens.words.is_empty());
        assert!(tokens.sentences.is_empty());
    }

    #[test]
    fn text_without_terminator_is_one_sentence() {
        let tokens = tokenize(b"no terminator here\nat all");
        assert_eq!(tokens.sentences, vec!["no terminator here\nat all"]);
    }
}
