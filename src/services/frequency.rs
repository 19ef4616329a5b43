use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::model::entry::WordEntry;
use crate::parsers::text;

/// Folds tokens into `(word, count)` pairs in first-occurrence order.
pub fn count_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for token in tokens {
        let token = token.as_ref();
        match index.get(token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token.to_string(), 1));
            }
        }
    }

    counts
}

/// One `WordEntry` per unique token, most frequent first. A word found in
/// no sentence keeps `sentence: None`.
pub fn aggregate<S: AsRef<str>>(tokens: &[S], sentences: Option<&[String]>) -> Vec<WordEntry> {
    let counts = count_tokens(tokens);

    let examples = match sentences {
        Some(sentences) => first_sentences(counts.iter().map(|(w, _)| w.as_str()), sentences),
        None => HashMap::new(),
    };

    let mut missing = 0usize;
    let mut entries: Vec<WordEntry> = counts
        .into_iter()
        .map(|(word, count)| {
            let sentence =
                sentences.and_then(|s| examples.get(word.as_str()).map(|&i| s[i].clone()));
            if sentences.is_some() && sentence.is_none() {
                debug!("no example sentence for '{word}'");
                missing += 1;
            }
            WordEntry {
                word,
                count,
                sentence,
            }
        })
        .collect();

    if missing > 0 {
        warn!("{missing} word(s) have no example sentence");
    }

    // sort_by is stable
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Word -> index of the first sentence holding it as a whole token.
pub fn first_sentences<'a, I>(words: I, sentences: &[String]) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut pending: HashSet<&'a str> = words.into_iter().collect();
    let mut found: HashMap<String, usize> = HashMap::with_capacity(pending.len());

    for (i, sentence) in sentences.iter().enumerate() {
        if pending.is_empty() {
            break;
        }
        for token in text::words(sentence) {
            if pending.remove(token.as_str()) {
                found.insert(token, i);
            }
        }
    }

    found
}
