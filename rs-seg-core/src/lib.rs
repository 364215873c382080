//! Word-boundary prediction from character n-gram statistics.
//!
//! This crate learns where spaces belong in unspaced or noisily-spaced
//! text, and measures how well it does on labeled text:
//! - An arena-backed frequency trie over character windows
//! - A pruning pass that keeps only top-choice predictions
//! - A back-off predictor and segmenter
//! - A streaming model format
//! - Training and evaluation drivers over CSV rows

/// Boundary model: trie, pruning, prediction, serialization, drivers.
pub mod model;

/// Training and evaluation parameters.
pub mod config;

/// Error type shared by the whole crate.
pub mod error;

/// CSV row reading and text helpers.
pub mod io;

pub use error::{Result, SegError};
pub use model::trie::Trie;
