use serde::{Deserialize, Serialize};

/// One row of a translated export, reduced to the columns the cache needs.
/// Other columns in the file are ignored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CacheRow {
    pub normalized: String,

    #[serde(default)]
    pub translation: String,
}

impl CacheRow {
    pub fn new(normalized: impl Into<String>, translation: impl Into<String>) -> Self {
        CacheRow {
            normalized: normalized.into(),
            translation: translation.into(),
        }
    }
}
