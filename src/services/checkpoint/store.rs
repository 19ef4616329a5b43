use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, VocabError};

/// Writes `rows` as CSV with a header derived from `T`'s fields. The file
/// appears complete or not at all. Returns the number of rows written; an
/// empty slice writes nothing and removes any file left by an earlier run.
pub fn export<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize> {
    if rows.is_empty() {
        if path.exists() {
            fs::remove_file(path).map_err(|e| VocabError::export(path, e.to_string()))?;
            warn!("nothing to save, removed stale {}", path.display());
        } else {
            warn!("nothing to save to {}", path.display());
        }
        return Ok(0);
    }

    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| VocabError::export(path, e.to_string()))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| VocabError::export(path, e.to_string()))?;

    write_atomic(path, &bytes).map_err(|e| VocabError::export(path, e.to_string()))?;

    info!("saved {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

pub fn import<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }

    Ok(rows)
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    // rename replaces the target in one step on every supported platform
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "checkpoint".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
