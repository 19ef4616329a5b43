use std::collections::HashMap;

use crate::model::entry::{ConsolidatedEntry, NormalizedEntry, SEPARATOR};

/// Merges every entry sharing a lemma into one record.
///
/// The first entry for a lemma fixes its position; later ones add their
/// count and append one item each to `word`, `sentence` and `tags`. The
/// result is re-sorted by descending total count, ties in merge order.
pub fn consolidate(entries: Vec<NormalizedEntry>) -> Vec<ConsolidatedEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<ConsolidatedEntry> = Vec::new();

    for entry in entries {
        let sentence = entry.sentence.as_deref().unwrap_or("");

        match index.get(&entry.normalized) {
            Some(&i) => {
                let target = &mut merged[i];
                target.count += entry.count;
                append_item(&mut target.word, &entry.word);
                append_item(&mut target.sentence, sentence);
                append_item(&mut target.tags, &entry.tags);
            }
            None => {
                index.insert(entry.normalized.clone(), merged.len());
                merged.push(ConsolidatedEntry {
                    word: item(&entry.word),
                    sentence: item(sentence),
                    tags: item(&entry.tags),
                    normalized: entry.normalized,
                    count: entry.count,
                });
            }
        }
    }

    // sort_by is stable
    merged.sort_by(|a, b| b.count.cmp(&a.count));
    merged
}

fn item(value: &str) -> String {
    // keep item counts aligned
    value.replace(SEPARATOR, ",")
}

fn append_item(joined: &mut String, value: &str) {
    joined.push(SEPARATOR);
    joined.push_str(&item(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, normalized: &str, count: usize, sentence: &str, tags: &str) -> NormalizedEntry {
        NormalizedEntry {
            word: word.into(),
            normalized: normalized.into(),
            count,
            sentence: if sentence.is_empty() {
                None
            } else {
                Some(sentence.into())
            },
            tags: tags.into(),
        }
    }

    #[test]
    fn merges_variants_of_one_lemma() {
        let out = consolidate(vec![
            entry("running", "run", 3, "He is running.", "VERB"),
            entry("ran", "run", 2, "He ran fast.", "VERB"),
        ]);

        assert_eq!(
            out,
            vec![ConsolidatedEntry {
                word: "running;ran".into(),
                normalized: "run".into(),
                count: 5,
                sentence: "He is running.;He ran fast.".into(),
                tags: "VERB;VERB".into(),
            }]
        );
    }

    #[test]
    fn reorders_by_total_with_stable_ties() {
        let out = consolidate(vec![
            entry("палочку", "палочка", 4, "", "NOUN,femn"),
            entry("сказал", "сказать", 3, "", "VERB,perf,masc"),
            entry("дверь", "дверь", 3, "", "NOUN,femn"),
            entry("сказала", "сказать", 2, "", "VERB,perf,femn"),
            entry("палочкой", "палочка", 1, "", "NOUN,femn"),
        ]);

        let order: Vec<(&str, usize)> = out.iter().map(|e| (e.normalized.as_str(), e.count)).collect();
        assert_eq!(
            order,
            vec![("палочка", 5), ("сказать", 5), ("дверь", 3)]
        );
        assert_eq!(out[1].tags, "VERB,perf,masc;VERB,perf,femn");
        assert_eq!(out[0].word, "палочку;палочкой");
    }

    #[test]
    fn joined_columns_stay_aligned() {
        let out = consolidate(vec![
            entry("walked", "walk", 2, "we walked; then we ran.", ""),
            entry("walks", "walk", 1, "", ""),
            entry("walking", "walk", 1, "walking home.", "VERB"),
        ]);

        assert_eq!(out.len(), 1);
        let e = &out[0];
        assert!(e.is_aligned());
        assert_eq!(e.variants(), 3);
        assert_eq!(e.sentence, "we walked, then we ran.;;walking home.");
        assert_eq!(e.tags, ";;VERB");
    }

    #[test]
    fn totals_do_not_depend_on_input_order() {
        let input = vec![
            entry("a1", "alpha", 3, "", ""),
            entry("b1", "beta", 1, "", ""),
            entry("a2", "alpha", 2, "", ""),
            entry("g1", "gamma", 4, "", ""),
            entry("b2", "beta", 5, "", ""),
        ];

        let totals = |entries: Vec<NormalizedEntry>| {
            let mut v: Vec<(String, usize)> = consolidate(entries)
                .into_iter()
                .map(|e| (e.normalized, e.count))
                .collect();
            v.sort();
            v
        };

        let forward = totals(input.clone());
        let mut reversed = input.clone();
        reversed.reverse();
        let mut rotated = input;
        rotated.rotate_left(2);

        assert_eq!(forward, totals(reversed));
        assert_eq!(forward, totals(rotated));
        assert_eq!(
            forward,
            vec![
                ("alpha".to_string(), 5),
                ("beta".to_string(), 6),
                ("gamma".to_string(), 4)
            ]
        );
    }
}
