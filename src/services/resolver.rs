use log::{debug, info, warn};

use crate::model::entry::{ConsolidatedEntry, TranslatedEntry, Translation};
use crate::services::ai::{Pacer, Translator};
use crate::services::ai_types::{FailedItem, ResolveReport};
use crate::services::translation_cache::CacheIndex;

const PROGRESS_EVERY: usize = 25;

pub struct ResolveConfig<'a> {
    pub source_lang: &'a str,
    pub target_lang: &'a str,
    pub pacer: Pacer,
}

/// Produces exactly one `TranslatedEntry` per input, in input order.
///
/// A usable cache row wins; otherwise the translator is called once. A
/// failed call becomes `Translation::Failed` and the run moves on. The
/// cache is never written to.
pub fn resolve(
    entries: Vec<ConsolidatedEntry>,
    cache: &CacheIndex,
    translator: &dyn Translator,
    cfg: &ResolveConfig,
) -> (Vec<TranslatedEntry>, ResolveReport) {
    let total = entries.len();
    let mut report = ResolveReport::default();
    let mut out: Vec<TranslatedEntry> = Vec::with_capacity(total);

    for (i, entry) in entries.into_iter().enumerate() {
        let translation = match cache.exact_match(&entry.normalized) {
            Some(hit) => {
                debug!("[cache] hit '{}'", entry.normalized);
                report.from_cache += 1;
                Translation::Ok(hit.to_string())
            }
            None => {
                if report.live_calls() > 0 {
                    cfg.pacer.wait();
                }
                call(translator, &entry.normalized, cfg, &mut report)
            }
        };

        out.push(TranslatedEntry::new(entry, translation));

        let done = i + 1;
        if done % PROGRESS_EVERY == 0 || done == total {
            info!("translated {done}/{total}");
        }
    }

    if report.failed > 0 {
        warn!(
            "{} of {} translations failed and were saved as ERROR; re-run to retry them",
            report.failed, total
        );
    }

    (out, report)
}

fn call(
    translator: &dyn Translator,
    lemma: &str,
    cfg: &ResolveConfig,
    report: &mut ResolveReport,
) -> Translation {
    match translator.translate(lemma, cfg.source_lang, cfg.target_lang) {
        Ok(t) if !t.trim().is_empty() => {
            report.translated += 1;
            Translation::Ok(t.trim().to_string())
        }
        Ok(_) => fail(lemma, "empty translation".to_string(), report),
        Err(e) => fail(lemma, e.to_string(), report),
    }
}

fn fail(lemma: &str, error: String, report: &mut ResolveReport) -> Translation {
    warn!("failed to translate '{lemma}': {error}");
    report.failed += 1;
    report.failures.push(FailedItem {
        normalized: lemma.to_string(),
        error: error.clone(),
    });
    Translation::failed(error)
}
