use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::entry::{TranslatedEntry, Translation, SEPARATOR};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuditIssue {
    pub normalized: String,
    pub code: String,
    pub message: String,
}

/// Checks the final rows for problems worth a human look.
pub fn run(entries: &[TranslatedEntry]) -> Vec<AuditIssue> {
    let mut issues: Vec<AuditIssue> = Vec::new();

    for e in entries {
        let mut push = |code: &str, message: String| {
            issues.push(AuditIssue {
                normalized: e.normalized.clone(),
                code: code.to_string(),
                message,
            })
        };

        if !e.is_aligned() {
            push(
                "MISALIGNED_FIELDS",
                format!(
                    "word/sentence/tags item counts differ: {}/{}/{}",
                    e.word.split(SEPARATOR).count(),
                    e.sentence.split(SEPARATOR).count(),
                    e.tags.split(SEPARATOR).count()
                ),
            );
        }

        match &e.translation {
            Translation::Failed { reason } => {
                push("TRANSLATION_FAILED", reason.clone());
            }
            Translation::Ok(t) => {
                if t.trim().to_lowercase() == e.normalized.trim().to_lowercase() {
                    push(
                        "SAME_AS_LEMMA",
                        "translation is identical to the lemma".to_string(),
                    );
                }
            }
        }

        // Every variant lacks an example.
        if e.sentence.split(SEPARATOR).all(|s| s.trim().is_empty()) {
            push(
                "MISSING_SENTENCE",
                "no example sentence for any variant".to_string(),
            );
        }
    }

    issues
}

pub fn summarize(issues: &[AuditIssue]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for issue in issues {
        *counts.entry(issue.code.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(word: &str, sentence: &str, tags: &str, translation: Translation) -> TranslatedEntry {
        TranslatedEntry {
            word: word.into(),
            normalized: "run".into(),
            count: 1,
            sentence: sentence.into(),
            tags: tags.into(),
            translation,
        }
    }

    #[test]
    fn clean_row_has_no_issues() {
        let e = row("running;ran", "a.;b.", "VERB;VERB", Translation::Ok("бежать".into()));
        assert!(run(&[e]).is_empty());
    }

    #[test]
    fn reports_each_problem() {
        let rows = vec![
            row("running;ran", "a.", "VERB;VERB", Translation::Ok("бежать".into())),
            row("run", "", "", Translation::failed("HTTP 500: boom")),
            row("run", "a.", "", Translation::Ok("Run".into())),
        ];
        let issues = run(&rows);
        let codes: Vec<&str> = issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "MISALIGNED_FIELDS",
                "TRANSLATION_FAILED",
                "MISSING_SENTENCE",
                "SAME_AS_LEMMA"
            ]
        );
        assert_eq!(issues[1].message, "HTTP 500: boom");

        let summary = summarize(&issues);
        assert_eq!(summary.get("TRANSLATION_FAILED"), Some(&1));
        assert_eq!(summary.len(), 4);
    }

    #[test]
    fn same_as_lemma_folds_cyrillic_case() {
        let mut e = row("палочку", "a.", "NOUN", Translation::Ok("Палочка".into()));
        e.normalized = "палочка".into();
        let codes: Vec<String> = run(&[e]).into_iter().map(|i| i.code).collect();
        assert_eq!(codes, vec!["SAME_AS_LEMMA"]);
    }
}
