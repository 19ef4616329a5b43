use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::services::filter::DEFAULT_MIN_LENGTH;

fn default_source_language() -> String {
    "ru".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_source_language", alias = "source_lang")]
    pub source_language: String,

    #[serde(default = "default_target_language", alias = "target_lang")]
    pub target_language: String,

    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_true", alias = "sentences")]
    pub include_sentences: bool,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Language code -> words never counted.
    #[serde(default)]
    pub exclusions: BTreeMap<String, ExclusionList>,

    #[serde(default)]
    pub morphology: MorphologyConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    /// Extra translation cache consulted before the previous run's output.
    #[serde(default)]
    pub cache: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            min_length: default_min_length(),
            include_sentences: true,
            output_dir: default_output_dir(),
            exclusions: BTreeMap::new(),
            morphology: MorphologyConfig::default(),
            translation: TranslationConfig::default(),
            cache: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    #[serde(default)]
    pub names: Vec<String>,

    /// Corpus-specific noise such as headers or publisher text.
    #[serde(default)]
    pub boilerplate: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MorphologyConfig {
    /// Tab-separated `form<TAB>lemma<TAB>tags` file.
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: String,

    /// Overrides the provider's chat completions URL.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub delay_ms: u64,

    #[serde(default)]
    pub jitter_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            enabled: true,
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            delay_ms: 0,
            jitter_ms: 0,
        }
    }
}

impl TranslationConfig {
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}
