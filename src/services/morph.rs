use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info, warn};

use crate::error::{Result, VocabError};
use crate::model::entry::{NormalizedEntry, WordEntry};
use crate::services::checkpoint::hash;
use crate::services::filter;

const POS_TAGS: &[&str] = &[
    // OpenCorpora
    "NOUN", "ADJF", "ADJS", "COMP", "VERB", "INFN", "PRTF", "PRTS", "GRND", "NUMR", "ADVB", "NPRO",
    "PRED", "PREP", "CONJ", "PRCL", "INTJ",
    // Universal Dependencies
    "ADJ", "ADP", "ADV", "AUX", "CCONJ", "DET", "NUM", "PART", "PRON", "PROPN", "SCONJ",
];
const ASPECT_TAGS: &[&str] = &["perf", "impf"];
const GENDER_TAGS: &[&str] = &["masc", "femn", "neut", "ms-f"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub normal_form: String,
    /// Part of speech, aspect and gender, in that order, when present.
    pub tags: Vec<String>,
}

impl Analysis {
    pub fn identity(word: &str) -> Self {
        Analysis {
            normal_form: word.to_string(),
            tags: Vec::new(),
        }
    }
}

/// Maps a surface form to candidate analyses, most likely first. An empty
/// vector means the word could not be analysed.
pub trait Analyzer {
    fn analyze(&self, word: &str) -> Result<Vec<Analysis>>;

    /// Identifies the analyzer and its data; a different id invalidates
    /// saved normalization results.
    fn id(&self) -> String {
        "custom".to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityAnalyzer;

impl Analyzer for IdentityAnalyzer {
    fn analyze(&self, word: &str) -> Result<Vec<Analysis>> {
        Ok(vec![Analysis::identity(word)])
    }

    fn id(&self) -> String {
        "identity".to_string()
    }
}

/// Lemma lookup backed by a tab-separated `form<TAB>lemma[<TAB>tags]` file.
/// Repeated forms add further candidates in file order; unknown forms are
/// their own lemma.
#[derive(Debug, Default, Clone)]
pub struct DictionaryAnalyzer {
    forms: HashMap<String, Vec<Analysis>>,
    id: String,
}

impl DictionaryAnalyzer {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            VocabError::Analysis(format!("failed to open {}: {e}", path.display()))
        })?;
        let mut analyzer = Self::from_reader(bytes.as_slice())?;
        analyzer.id = format!("dictionary:{}", hash::fingerprint(&[bytes.as_slice()]));
        info!(
            "loaded {} forms from {}",
            analyzer.forms.len(),
            path.display()
        );
        Ok(analyzer)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut forms: HashMap<String, Vec<Analysis>> = HashMap::new();

        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let form = record.get(0).map(str::trim).unwrap_or("");
            let lemma = record.get(1).map(str::trim).unwrap_or("");

            if form.is_empty() || lemma.is_empty() {
                return Err(VocabError::Analysis(format!(
                    "dictionary record {} needs a form and a lemma",
                    i + 1
                )));
            }

            let tags = record.get(2).map(parse_tags).unwrap_or_default();

            forms
                .entry(form.to_lowercase())
                .or_default()
                .push(Analysis {
                    normal_form: lemma.to_lowercase(),
                    tags,
                });
        }

        Ok(DictionaryAnalyzer {
            forms,
            id: "dictionary".to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Analyzer for DictionaryAnalyzer {
    fn analyze(&self, word: &str) -> Result<Vec<Analysis>> {
        Ok(self
            .forms
            .get(word)
            .cloned()
            .unwrap_or_else(|| vec![Analysis::identity(word)]))
    }

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Keeps part-of-speech, aspect and gender tags, ordered by category.
/// Anything else (case, number, tense...) is dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let found: Vec<&str> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    [POS_TAGS, ASPECT_TAGS, GENDER_TAGS]
        .iter()
        .filter_map(|category| found.iter().find(|t| category.contains(*t)))
        .map(|t| t.to_string())
        .collect()
}

#[derive(Debug, Default)]
pub struct Normalization {
    pub entries: Vec<NormalizedEntry>,
    /// Words the analyzer failed on or had no reading for.
    pub skipped: Vec<String>,
    pub too_short: usize,
}

/// Attaches the first analysis to every entry. Words that cannot be
/// analysed are skipped with a warning; lemmas shorter than `min_length`
/// are dropped.
pub fn normalize_entries(
    analyzer: &dyn Analyzer,
    entries: Vec<WordEntry>,
    min_length: usize,
) -> Normalization {
    let mut out = Normalization {
        entries: Vec::with_capacity(entries.len()),
        ..Normalization::default()
    };

    for entry in entries {
        let first = match analyzer.analyze(&entry.word) {
            Ok(candidates) => candidates.into_iter().next(),
            Err(e) => {
                warn!("analyzer failed on '{}': {e}", entry.word);
                out.skipped.push(entry.word);
                continue;
            }
        };

        let Some(analysis) = first else {
            warn!("no analysis for '{}', skipping", entry.word);
            out.skipped.push(entry.word);
            continue;
        };

        if !filter::is_long_enough(&analysis.normal_form, min_length) {
            debug!(
                "dropping '{}': lemma '{}' is too short",
                entry.word, analysis.normal_form
            );
            out.too_short += 1;
            continue;
        }

        let tags = analysis.tags.join(",");
        out.entries
            .push(NormalizedEntry::new(entry, analysis.normal_form, tags));
    }

    out
}
