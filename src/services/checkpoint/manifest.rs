use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::store;
use crate::error::{Result, VocabError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointPaths {
    pub raw: PathBuf,
    pub consolidated: PathBuf,
    pub translated: PathBuf,
    pub manifest: PathBuf,
}

impl CheckpointPaths {
    pub fn new(output_dir: &Path, input: &Path) -> Self {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("corpus");

        CheckpointPaths {
            raw: output_dir.join(format!("{stem}_raw_unique_words.csv")),
            consolidated: output_dir.join(format!("{stem}_nominative_case_unique_words.csv")),
            translated: output_dir.join(format!("{stem}_translated_words.csv")),
            manifest: output_dir.join(format!("{stem}_manifest.json")),
        }
    }
}

/// Fingerprints of the inputs each saved checkpoint was computed from.
/// A checkpoint is only reused when its fingerprint still matches.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    #[serde(default)]
    pub aggregated: Option<String>,

    #[serde(default)]
    pub consolidated: Option<String>,

    #[serde(default)]
    pub translated: Option<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Manifest {
        if !path.exists() {
            return Manifest::default();
        }

        let data = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to read {}: {e}", path.display());
                return Manifest::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(m) => m,
            Err(e) => {
                warn!("ignoring invalid manifest {}: {e}", path.display());
                Manifest::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        store::write_atomic(path, json.as_bytes())
            .map_err(|e| VocabError::export(path, e.to_string()))?;
        debug!("manifest updated at {}", path.display());
        Ok(())
    }
}

pub fn is_current(recorded: Option<&str>, expected: &str, file: &Path) -> bool {
    recorded == Some(expected) && file.exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_input_stem() {
        let p = CheckpointPaths::new(Path::new("out"), Path::new("/books/harry_potter_1.txt"));
        assert_eq!(p.raw, Path::new("out/harry_potter_1_raw_unique_words.csv"));
        assert_eq!(
            p.consolidated,
            Path::new("out/harry_potter_1_nominative_case_unique_words.csv")
        );
        assert_eq!(p.translated, Path::new("out/harry_potter_1_translated_words.csv"));
        assert_eq!(p.manifest, Path::new("out/harry_potter_1_manifest.json"));
    }

    #[test]
    fn manifest_round_trip_and_staleness() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        assert_eq!(Manifest::load(&path), Manifest::default());

        let m = Manifest {
            aggregated: Some("abc".into()),
            ..Manifest::default()
        };
        m.save(&path).unwrap();
        let loaded = Manifest::load(&path);
        assert_eq!(loaded, m);

        let file = dir.path().join("raw.csv");
        assert!(!is_current(loaded.aggregated.as_deref(), "abc", &file));
        fs::write(&file, "word,count,sentence\n").unwrap();
        assert!(is_current(loaded.aggregated.as_deref(), "abc", &file));
        assert!(!is_current(loaded.aggregated.as_deref(), "abd", &file));
        assert!(!is_current(loaded.consolidated.as_deref(), "abc", &file));
    }

    #[test]
    fn corrupt_manifest_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Manifest::load(&path), Manifest::default());
    }
}
