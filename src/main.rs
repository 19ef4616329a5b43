use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use env_logger::Builder;
use log::{warn, LevelFilter};

use vocab_core::services::{
    ai::{ChatTranslator, Translator},
    config,
    morph::{Analyzer, DictionaryAnalyzer, IdentityAnalyzer},
    pipeline::{self, PipelineOptions, PipelineReport},
};
use vocab_core::{Result, VocabError};

#[derive(Parser)]
#[command(
    name = "vocab-core",
    about = "Build a frequency-ranked, lemmatized vocabulary list from a book"
)]
struct Cli {
    /// Source text file
    input: PathBuf,

    /// JSON config file (defaults to ./vocab.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for checkpoint files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Shortest word or lemma kept
    #[arg(long)]
    min_length: Option<usize>,

    /// Extra translation cache (a previous translated export)
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Tab-separated lemma dictionary
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Stop after the consolidated checkpoint
    #[arg(long)]
    no_translate: bool,

    /// Skip example sentence lookup
    #[arg(long)]
    no_sentences: bool,

    /// Recompute every stage, ignoring saved checkpoints
    #[arg(long)]
    fresh: bool,

    /// Translation API key
    #[arg(long, env = "VOCAB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Increase verbosity (-v debug, -vv trace); progress is shown by default
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let mut builder = Builder::new();
    builder
        .filter_level(log_level(cli.verbose))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

// Progress is logged at info.
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.is_file() {
        return Err(VocabError::input(&cli.input, "no such file"));
    }

    let mut cfg = config::load(cli.config.as_deref())?;

    if let Some(dir) = cli.output_dir {
        cfg.output_dir = dir;
    }
    if let Some(n) = cli.min_length {
        if n == 0 {
            return Err(VocabError::config("--min-length must be at least 1"));
        }
        cfg.min_length = n;
    }
    if cli.cache.is_some() {
        cfg.cache = cli.cache;
    }
    if cli.dictionary.is_some() {
        cfg.morphology.dictionary = cli.dictionary;
    }
    if cli.no_translate {
        cfg.translation.enabled = false;
    }
    if cli.no_sentences {
        cfg.include_sentences = false;
    }
    if let Some(key) = cli.api_key {
        cfg.translation.api_key = key;
    }

    let analyzer: Box<dyn Analyzer> = match &cfg.morphology.dictionary {
        Some(path) => Box::new(DictionaryAnalyzer::load(path)?),
        None => Box::new(IdentityAnalyzer),
    };

    let translator = if cfg.translation.is_usable() {
        Some(ChatTranslator::new(&cfg.translation)?)
    } else {
        if cfg.translation.enabled {
            warn!("no translation API key configured (--api-key or VOCAB_API_KEY); skipping translation");
        }
        None
    };

    let mut opts = PipelineOptions::from_config(&cfg, cli.input);
    opts.resume = !cli.fresh;

    let report = pipeline::run(
        &opts,
        analyzer.as_ref(),
        translator.as_ref().map(|t| t as &dyn Translator),
    )?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    println!("encoding:        {}", report.encoding);
    if !report.resumed.is_empty() {
        println!("resumed from:    {:?}", report.resumed);
    }
    println!("tokens kept:     {}", report.filtered_tokens);
    println!("unique words:    {}", report.unique_words);
    println!("lemmas:          {}", report.lemmas);
    if !report.skipped_words.is_empty() {
        println!("unanalysed:      {}", report.skipped_words.len());
    }
    if let Some(t) = &report.translation {
        println!(
            "translations:    {} cached, {} new, {} failed",
            t.from_cache, t.translated, t.failed
        );
    }
    println!("ERROR entries:   {}", report.errors);
    for (code, n) in &report.audit {
        println!("audit {code}: {n}");
    }
    for path in &report.outputs {
        println!("wrote {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_visible_without_flags() {
        assert_eq!(log_level(0), LevelFilter::Info);
        assert_eq!(log_level(1), LevelFilter::Debug);
        assert_eq!(log_level(5), LevelFilter::Trace);
    }
}
