use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::{Result, VocabError};
use crate::model::config::Config;

pub const DEFAULT_CONFIG_FILE: &str = "vocab.json";

/// Loads an explicit config file, or `vocab.json` from the working
/// directory when present, or the built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(VocabError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return open(path);
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        return open(fallback);
    }

    debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
    Ok(Config::default())
}

pub fn open(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .map_err(|e| VocabError::config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = serde_json::from_str(&data)
        .map_err(|e| VocabError::config(format!("invalid {}: {e}", path.display())))?;

    if config.min_length == 0 {
        return Err(VocabError::config("min_length must be at least 1"));
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Flattens the names and boilerplate configured for `language` into a
/// single lowercase set. Unknown languages get an empty set.
pub fn exclusion_set(config: &Config, language: &str) -> HashSet<String> {
    let Some(list) = config.exclusions.get(language) else {
        return HashSet::new();
    };

    list.names
        .iter()
        .chain(list.boilerplate.iter())
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_fill_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "source_lang": "de", "min_length": 3 }}"#).unwrap();

        let config = open(file.path()).unwrap();
        assert_eq!(config.source_language, "de");
        assert_eq!(config.target_language, "en");
        assert_eq!(config.min_length, 3);
        assert!(config.include_sentences);
        assert!(config.translation.enabled);
        assert!(!config.translation.is_usable());
    }

    #[test]
    fn default_min_length_matches_filter() {
        assert_eq!(
            Config::default().min_length,
            crate::services::filter::DEFAULT_MIN_LENGTH
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, VocabError::Config(_)));
    }

    #[test]
    fn zero_min_length_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "min_length": 0 }}"#).unwrap();
        assert!(open(file.path()).is_err());
    }

    #[test]
    fn exclusions_merge_both_sources() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "exclusions": {{
                "ru": {{ "names": ["Гарри", " рон "], "boilerplate": ["глава"] }},
                "en": {{ "names": ["harry"] }}
            }} }}"#
        )
        .unwrap();

        let config = open(file.path()).unwrap();
        let set = exclusion_set(&config, "ru");
        assert_eq!(set.len(), 3);
        assert!(set.contains("гарри"));
        assert!(set.contains("рон"));
        assert!(set.contains("глава"));
        assert!(!set.contains("harry"));
        assert!(exclusion_set(&config, "fr").is_empty());
    }

    #[test]
    fn shipped_example_parses() {
        let config: Config =
            serde_json::from_str(include_str!("../../config/vocab.example.json")).unwrap();
        let set = exclusion_set(&config, &config.source_language);
        assert!(set.contains("гарри"));
        assert!(set.contains("хогварца"));
        assert_eq!(config.translation.delay_ms, 200);
        assert!(config.morphology.dictionary.is_none());
    }
}
