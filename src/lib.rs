//! Builds frequency-ranked, lemmatized vocabulary lists from a book and
//! attaches example sentences and cached translations.

pub mod error;
pub mod model;
pub mod parsers;
pub mod services;

pub use error::{Result, VocabError};
