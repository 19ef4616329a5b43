use std::collections::HashMap;

use super::model::CacheRow;
use super::normalize;
use crate::model::entry::ERROR_SENTINEL;

/// Index over cache rows keyed by normalized lemma. The first row for a
/// lemma shadows any later ones.
#[derive(Debug, Default)]
pub struct CacheIndex {
    rows: Vec<CacheRow>,
    by_key: HashMap<String, usize>,
}

impl CacheIndex {
    pub fn new(rows: Vec<CacheRow>) -> Self {
        let mut by_key: HashMap<String, usize> = HashMap::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            by_key.entry(normalize::normalize(&row.normalized)).or_insert(i);
        }

        CacheIndex { rows, by_key }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn get(&self, lemma: &str) -> Option<&CacheRow> {
        self.by_key
            .get(&normalize::normalize(lemma))
            .map(|&i| &self.rows[i])
    }

    /// A usable cached translation: the first row exists and is neither
    /// empty nor the failure sentinel.
    pub fn exact_match(&self, lemma: &str) -> Option<&str> {
        let row = self.get(lemma)?;
        let t = row.translation.trim();
        if t.is_empty() || t == ERROR_SENTINEL {
            return None;
        }
        Some(t)
    }
}
