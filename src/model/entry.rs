use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Joins the multi-value columns (`word`, `sentence`, `tags`) of a consolidated entry.
pub const SEPARATOR: char = ';';

pub const ERROR_SENTINEL: &str = "ERROR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub count: usize,

    /// First sentence containing the word; `None` when the sentence splitter
    /// and the tokenizer disagree or sentence lookup is disabled.
    #[serde(default)]
    pub sentence: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub word: String,
    pub normalized: String,
    pub count: usize,

    #[serde(default)]
    pub sentence: Option<String>,

    /// Comma-joined grammatical tags, possibly empty.
    #[serde(default)]
    pub tags: String,
}

impl NormalizedEntry {
    pub fn new(entry: WordEntry, normalized: String, tags: String) -> Self {
        NormalizedEntry {
            word: entry.word,
            normalized,
            count: entry.count,
            sentence: entry.sentence,
            tags,
        }
    }
}

/// One record per lemma. `word`, `sentence` and `tags` hold one
/// `SEPARATOR`-joined item per merged surface form, positionally aligned.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConsolidatedEntry {
    pub word: String,
    pub normalized: String,
    pub count: usize,

    #[serde(default)]
    pub sentence: String,

    #[serde(default)]
    pub tags: String,
}

impl ConsolidatedEntry {
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.word.split(SEPARATOR)
    }

    pub fn variants(&self) -> usize {
        self.words().count()
    }

    pub fn is_aligned(&self) -> bool {
        columns_aligned(&self.word, &self.sentence, &self.tags)
    }
}

pub fn columns_aligned(word: &str, sentence: &str, tags: &str) -> bool {
    let n = word.split(SEPARATOR).count();
    sentence.split(SEPARATOR).count() == n && tags.split(SEPARATOR).count() == n
}

/// Outcome of resolving one lemma. The persisted format collapses
/// `Failed` to `ERROR_SENTINEL`; the reason only lives for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Ok(String),
    Failed { reason: String },
}

impl Translation {
    pub fn failed(reason: impl Into<String>) -> Self {
        Translation::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Translation::Failed { .. })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Translation::Ok(t) => t,
            Translation::Failed { .. } => ERROR_SENTINEL,
        }
    }

    /// Reads a persisted value back; the sentinel becomes `Failed`.
    pub fn from_persisted(value: &str) -> Self {
        if value == ERROR_SENTINEL {
            Translation::failed("failed in a previous run")
        } else {
            Translation::Ok(value.to_string())
        }
    }
}

impl Serialize for Translation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Translation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Translation::from_persisted(&raw))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TranslatedEntry {
    pub word: String,
    pub normalized: String,
    pub count: usize,

    #[serde(default)]
    pub sentence: String,

    #[serde(default)]
    pub tags: String,

    pub translation: Translation,
}

impl TranslatedEntry {
    pub fn new(entry: ConsolidatedEntry, translation: Translation) -> Self {
        TranslatedEntry {
            word: entry.word,
            normalized: entry.normalized,
            count: entry.count,
            sentence: entry.sentence,
            tags: entry.tags,
            translation,
        }
    }

    pub fn is_aligned(&self) -> bool {
        columns_aligned(&self.word, &self.sentence, &self.tags)
    }
}
