use std::collections::HashSet;

pub const DEFAULT_MIN_LENGTH: usize = 4;

/// Keeps tokens at least `min_length` characters long that are not in
/// `excluded`. Order is preserved.
pub fn filter_tokens<I, S>(tokens: I, min_length: usize, excluded: &HashSet<String>) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tokens
        .into_iter()
        .map(Into::into)
        .filter(|t| is_long_enough(t, min_length) && !excluded.contains(t))
        .collect()
}

/// Length in characters, not bytes.
pub fn is_long_enough(word: &str, min_length: usize) -> bool {
    word.chars().count() >= min_length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_short_and_excluded_tokens() {
        let excluded: HashSet<String> = ["гарри".to_string(), "chapter".to_string()].into();
        let out = filter_tokens(
            ["гарри", "палочка", "рон", "chapter", "wand", "палочка"],
            4,
            &excluded,
        );
        assert_eq!(out, vec!["палочка", "wand", "палочка"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // "рон" is 6 bytes but 3 characters.
        assert!(!is_long_enough("рон", 4));
        assert!(is_long_enough("рона", 4));
    }

    #[test]
    fn never_emits_violating_tokens() {
        let excluded: HashSet<String> = ["world".to_string()].into();
        let tokens = ["hello", "hello", "world", "a", "an", "wonderful", "abc", "abcd"];
        for min in 1..8 {
            for t in filter_tokens(tokens, min, &excluded) {
                assert!(t.chars().count() >= min);
                assert!(!excluded.contains(&t));
            }
        }
    }
}
