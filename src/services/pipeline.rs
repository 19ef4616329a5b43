use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::model::config::Config;
use crate::model::entry::{ConsolidatedEntry, TranslatedEntry, WordEntry};
use crate::parsers::text;
use crate::services::{
    ai::{Pacer, Translator},
    ai_types::ResolveReport,
    audit, config,
    checkpoint::{hash, manifest::is_current, store, CheckpointPaths, Manifest},
    consolidate, encoding, filter, frequency, morph,
    morph::Analyzer,
    resolver::{self, ResolveConfig},
    translation_cache::{self, CacheIndex},
};

/// Pipeline states, strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Started,
    Tokenized,
    Filtered,
    Aggregated,
    Normalized,
    Consolidated,
    Translated,
    Exported,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub source_language: String,
    pub target_language: String,
    pub min_length: usize,
    pub include_sentences: bool,
    pub exclusions: HashSet<String>,
    /// Consulted before the previous run's output.
    pub cache_files: Vec<PathBuf>,
    pub resume: bool,
    pub pacer: Pacer,
}

impl PipelineOptions {
    pub fn from_config(cfg: &Config, input: PathBuf) -> Self {
        PipelineOptions {
            input,
            output_dir: cfg.output_dir.clone(),
            source_language: cfg.source_language.clone(),
            target_language: cfg.target_language.clone(),
            min_length: cfg.min_length,
            include_sentences: cfg.include_sentences,
            exclusions: config::exclusion_set(cfg, &cfg.source_language),
            cache_files: cfg.cache.iter().cloned().collect(),
            resume: true,
            pacer: Pacer::from(&cfg.translation),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub stage: Stage,
    pub encoding: String,
    pub tokens: usize,
    pub sentences: usize,
    pub filtered_tokens: usize,
    pub unique_words: usize,
    pub normalized: usize,
    pub skipped_words: Vec<String>,
    pub short_lemmas: usize,
    pub lemmas: usize,
    /// Checkpoints loaded instead of recomputed.
    pub resumed: Vec<Stage>,
    pub translation: Option<ResolveReport>,
    pub errors: usize,
    pub audit: BTreeMap<String, usize>,
    pub outputs: Vec<PathBuf>,
}

impl PipelineReport {
    fn new() -> Self {
        PipelineReport {
            stage: Stage::Started,
            encoding: String::new(),
            tokens: 0,
            sentences: 0,
            filtered_tokens: 0,
            unique_words: 0,
            normalized: 0,
            skipped_words: Vec::new(),
            short_lemmas: 0,
            lemmas: 0,
            resumed: Vec::new(),
            translation: None,
            errors: 0,
            audit: BTreeMap::new(),
            outputs: Vec::new(),
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

/// Runs every stage for one source file. Aggregated, consolidated and
/// translated results are saved as they are produced, so a failure later
/// on keeps earlier work. Translation is skipped when `translator` is
/// `None`.
pub fn run(
    opts: &PipelineOptions,
    analyzer: &dyn Analyzer,
    translator: Option<&dyn Translator>,
) -> Result<PipelineReport> {
    let mut report = PipelineReport::new();

    let source = encoding::read_source(&opts.input)?;
    report.encoding = source.encoding.clone();

    let paths = CheckpointPaths::new(&opts.output_dir, &opts.input);
    let mut manifest = if opts.resume {
        Manifest::load(&paths.manifest)
    } else {
        Manifest::default()
    };

    // Aggregation
    let aggregated_key = aggregation_fingerprint(opts, &source.text);
    let words: Vec<WordEntry> =
        if is_current(manifest.aggregated.as_deref(), &aggregated_key, &paths.raw) {
            info!("reusing {}", paths.raw.display());
            let words: Vec<WordEntry> = store::import(&paths.raw)?;
            report.filtered_tokens = words.iter().map(|w| w.count).sum();
            report.resumed.push(Stage::Aggregated);
            report.stage = Stage::Aggregated;
            words
        } else {
            let words = tokenize_and_count(opts, &source.text, &mut report);
            manifest.aggregated =
                save_checkpoint(&paths.raw, &words, &aggregated_key, &mut report)?;
            manifest.consolidated = None;
            manifest.save(&paths.manifest)?;
            words
        };
    report.unique_words = words.len();
    info!("{} unique words", words.len());

    // Normalization and consolidation
    let consolidated_key = hash::fingerprint(&[
        aggregated_key.as_bytes(),
        analyzer.id().as_bytes(),
        opts.min_length.to_string().as_bytes(),
    ]);
    let lemmas: Vec<ConsolidatedEntry> = if is_current(
        manifest.consolidated.as_deref(),
        &consolidated_key,
        &paths.consolidated,
    ) {
        info!("reusing {}", paths.consolidated.display());
        report.resumed.push(Stage::Consolidated);
        report.stage = Stage::Consolidated;
        store::import(&paths.consolidated)?
    } else {
        let normalization = morph::normalize_entries(analyzer, words, opts.min_length);
        report.advance(Stage::Normalized);
        report.normalized = normalization.entries.len();
        report.skipped_words = normalization.skipped;
        report.short_lemmas = normalization.too_short;
        info!(
            "normalized {} entries ({} skipped, {} lemmas too short)",
            report.normalized,
            report.skipped_words.len(),
            report.short_lemmas
        );

        let lemmas = consolidate::consolidate(normalization.entries);
        report.advance(Stage::Consolidated);
        manifest.consolidated =
            save_checkpoint(&paths.consolidated, &lemmas, &consolidated_key, &mut report)?;
        manifest.save(&paths.manifest)?;
        lemmas
    };
    report.lemmas = lemmas.len();
    info!("{} lemmas after consolidation", lemmas.len());

    let Some(translator) = translator else {
        info!("translation disabled, stopping after consolidation");
        return Ok(report);
    };

    // Translation
    let translation_key = hash::fingerprint(&[
        opts.source_language.as_bytes(),
        opts.target_language.as_bytes(),
    ]);
    let mut cache_files: Vec<&Path> = opts.cache_files.iter().map(PathBuf::as_path).collect();
    if opts.resume && manifest.translated.as_deref() == Some(translation_key.as_str()) {
        cache_files.push(&paths.translated);
    }
    let cache = CacheIndex::new(translation_cache::store::load(&cache_files));
    info!("translation cache holds {} lemmas", cache.len());

    let resolve_cfg = ResolveConfig {
        source_lang: &opts.source_language,
        target_lang: &opts.target_language,
        pacer: opts.pacer,
    };
    let (translated, resolved) = resolver::resolve(lemmas, &cache, translator, &resolve_cfg);
    report.advance(Stage::Translated);
    report.errors = resolved.failed;
    report.translation = Some(resolved);

    let issues = audit::run(&translated);
    report.audit = audit::summarize(&issues);

    manifest.translated = save_checkpoint::<TranslatedEntry>(
        &paths.translated,
        &translated,
        &translation_key,
        &mut report,
    )?;
    manifest.save(&paths.manifest)?;
    report.advance(Stage::Exported);

    Ok(report)
}

fn tokenize_and_count(
    opts: &PipelineOptions,
    text: &str,
    report: &mut PipelineReport,
) -> Vec<WordEntry> {
    let tokenized = text::split(text);
    report.advance(Stage::Tokenized);
    report.tokens = tokenized.tokens.len();
    report.sentences = tokenized.sentences.len();
    info!(
        "read {} tokens in {} sentences",
        report.tokens, report.sentences
    );

    let tokens = filter::filter_tokens(tokenized.tokens, opts.min_length, &opts.exclusions);
    report.advance(Stage::Filtered);
    report.filtered_tokens = tokens.len();
    info!("{} tokens after filtering", tokens.len());

    let sentences = opts
        .include_sentences
        .then_some(tokenized.sentences.as_slice());
    let words = frequency::aggregate(&tokens, sentences);
    report.advance(Stage::Aggregated);
    words
}

/// Saves a stage result and returns the fingerprint to record for it, or
/// `None` when there was nothing to save.
fn save_checkpoint<T: Serialize>(
    path: &Path,
    rows: &[T],
    key: &str,
    report: &mut PipelineReport,
) -> Result<Option<String>> {
    if store::export(path, rows)? == 0 {
        return Ok(None);
    }
    report.outputs.push(path.to_path_buf());
    Ok(Some(key.to_string()))
}

fn aggregation_fingerprint(opts: &PipelineOptions, text: &str) -> String {
    let mut excluded: Vec<&str> = opts.exclusions.iter().map(String::as_str).collect();
    excluded.sort_unstable();
    let excluded = excluded.join("\n");
    let min_length = opts.min_length.to_string();
    let sentences: &[u8] = if opts.include_sentences { b"1" } else { b"0" };

    hash::fingerprint(&[
        text.as_bytes(),
        min_length.as_bytes(),
        excluded.as_bytes(),
        sentences,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(dir: &Path) -> PipelineOptions {
        PipelineOptions {
            input: dir.join("book.txt"),
            output_dir: dir.join("out"),
            source_language: "en".into(),
            target_language: "ru".into(),
            min_length: 4,
            include_sentences: true,
            exclusions: HashSet::new(),
            cache_files: Vec::new(),
            resume: true,
            pacer: Pacer::default(),
        }
    }

    #[test]
    fn fingerprint_tracks_settings() {
        let dir = tempfile::tempdir().unwrap();
        let base = opts(dir.path());
        let key = aggregation_fingerprint(&base, "text");

        assert_eq!(key, aggregation_fingerprint(&base.clone(), "text"));
        assert_ne!(key, aggregation_fingerprint(&base, "other text"));

        let mut shorter = base.clone();
        shorter.min_length = 3;
        assert_ne!(key, aggregation_fingerprint(&shorter, "text"));

        let mut excluded = base.clone();
        excluded.exclusions.insert("harry".into());
        assert_ne!(key, aggregation_fingerprint(&excluded, "text"));

        let mut bare = base;
        bare.include_sentences = false;
        assert_ne!(key, aggregation_fingerprint(&bare, "text"));
    }

    #[test]
    fn missing_input_is_fatal_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let o = opts(dir.path());
        let err = run(&o, &morph::IdentityAnalyzer, None).unwrap_err();
        assert!(matches!(err, crate::error::VocabError::Input { .. }));
        assert!(!o.output_dir.exists());
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Tokenized < Stage::Filtered);
        assert!(Stage::Consolidated < Stage::Translated);
        assert!(Stage::Translated < Stage::Exported);
    }
}
