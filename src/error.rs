use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot read {}: {message}", path.display())]
    Input { path: PathBuf, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("analysis error: {0}")]
    Analysis(String),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("failed to export {}: {message}", path.display())]
    Export { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, VocabError>;

impl VocabError {
    pub fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        VocabError::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn export(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        VocabError::Export {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        VocabError::Config(msg.into())
    }

    pub fn translation(msg: impl Into<String>) -> Self {
        VocabError::Translation(msg.into())
    }
}
