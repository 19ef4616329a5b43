//! Read-only lookup of translations produced by earlier runs.

pub mod matcher;
pub mod model;
pub mod normalize;
pub mod store;

pub use matcher::CacheIndex;
pub use model::CacheRow;
