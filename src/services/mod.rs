pub mod ai;
pub mod ai_types;
pub mod audit;
pub mod checkpoint;
pub mod config;
pub mod consolidate;
pub mod encoding;
pub mod filter;
pub mod frequency;
pub mod morph;
pub mod pipeline;
pub mod resolver;
pub mod translation_cache;
