use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<String>,
    /// Lowercase sentences in document order, whitespace collapsed.
    pub sentences: Vec<String>,
}

/// Splits `text` into word tokens and sentences using Unicode segmentation
/// (UAX #29), which needs no per-language model.
pub fn split(text: &str) -> Tokenized {
    // Books are usually hard-wrapped: a single line break is not a sentence
    // boundary, a blank line is.
    let paragraph_re = Regex::new(r"\n[ \t\r]*\n").unwrap();
    let space_re = Regex::new(r"\s+").unwrap();

    let mut sentences = Vec::new();
    for paragraph in paragraph_re.split(text) {
        let flat = space_re.replace_all(paragraph.trim(), " ");
        sentences.extend(
            flat.unicode_sentences()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );
    }

    let tokens = words(text);

    Tokenized { tokens, sentences }
}

/// Lowercase words of `text`; segments without a letter (numbers,
/// punctuation) are dropped.
pub fn words(text: &str) -> Vec<String> {
    text.unicode_words()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_sentences() {
        let t = split("Hello, world! Hello again.\nAnd 42 more.");
        assert_eq!(
            t.tokens,
            vec!["hello", "world", "hello", "again", "and", "more"]
        );
        assert_eq!(
            t.sentences,
            vec!["hello, world!", "hello again.", "and 42 more."]
        );
    }

    #[test]
    fn joins_hard_wrapped_lines() {
        let t = split("Мистер и миссис\nДурсль жили в доме\nномер четыре.\n\nГлава вторая");
        assert_eq!(
            t.sentences,
            vec![
                "мистер и миссис дурсль жили в доме номер четыре.",
                "глава вторая"
            ]
        );
        assert_eq!(t.tokens.len(), 11);
    }

    #[test]
    fn empty_text() {
        assert_eq!(split(""), Tokenized::default());
    }
}
