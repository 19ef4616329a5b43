//! Durable stage outputs and the bookkeeping that lets a run resume.

pub mod hash;
pub mod manifest;
pub mod store;

pub use manifest::{CheckpointPaths, Manifest};
