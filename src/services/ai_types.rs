use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub normalized: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    pub from_cache: usize,
    pub translated: usize,
    pub failed: usize,
    pub failures: Vec<FailedItem>,
}

impl ResolveReport {
    pub fn live_calls(&self) -> usize {
        self.translated + self.failed
    }
}
