use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info, warn};

use super::model::CacheRow;
use crate::error::Result;

/// Rows of every existing file, in the given order. Unparseable files are
/// skipped with a warning.
pub fn load(paths: &[&Path]) -> Vec<CacheRow> {
    let mut rows = Vec::new();

    for path in paths {
        if !path.exists() {
            debug!("[cache] {} not found, skipping", path.display());
            continue;
        }

        match read(path) {
            Ok(mut v) => {
                info!("[cache] {} rows from {}", v.len(), path.display());
                rows.append(&mut v);
            }
            Err(e) => warn!("[cache] failed to read {}: {e}", path.display()),
        }
    }

    rows
}

pub fn read(path: &Path) -> Result<Vec<CacheRow>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut rows = Vec::new();
    for row in rdr.deserialize::<CacheRow>() {
        rows.push(row?);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_translated_export_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_translated_words.csv");
        fs::write(
            &path,
            "word,normalized,count,sentence,tags,translation\n\
             running;ran,run,5,he is running.;he ran fast.,VERB;VERB,to run\n\
             xyzzy,xyzzy,1,,,ERROR\n",
        )
        .unwrap();

        let rows = read(&path).unwrap();
        assert_eq!(
            rows,
            vec![CacheRow::new("run", "to run"), CacheRow::new("xyzzy", "ERROR")]
        );
    }

    #[test]
    fn load_concatenates_and_skips_missing_or_broken() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let broken = dir.path().join("b.csv");
        let second = dir.path().join("c.csv");
        fs::write(&first, "normalized,translation\nrun,to run\n").unwrap();
        fs::write(&broken, "word,count\nrun,3\n").unwrap();
        fs::write(&second, "normalized,translation\nrun,to sprint\nwalk,to walk\n").unwrap();
        let missing = dir.path().join("missing.csv");

        let rows = load(&[&first, &missing, &broken, &second]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].translation, "to run");
        assert_eq!(rows[2].normalized, "walk");
    }
}
