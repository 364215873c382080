//! Character n-gram boundary model.
//!
//! This module contains the whole learning pipeline:
//! - Arena-backed node storage (`arena`)
//! - The frequency trie and its sliding-window insertion (`trie`)
//! - The size-reducing pruning pass (`prune`)
//! - The back-off boundary predictor and segmenter (`predictor`)
//! - The self-delimiting model stream (`serializer`)
//! - Training and evaluation drivers (`training`, `evaluation`)

/// The boundary symbol whose position the model predicts.
pub const BOUNDARY: char = ' ';

/// Chunked, append-only node allocator.
///
/// Nodes are addressed by stable `NodeId` handles and never freed
/// individually.
pub mod arena;

/// Frequency trie built from overlapping windows of every length up to the
/// training depth.
pub mod trie;

/// Depth-first compaction keeping only the strongest child under all-leaf
/// sibling sets.
mod prune;

/// Longest-context-first boundary prediction.
mod predictor;

/// Model stream encoding and decoding (`postcard`).
pub mod serializer;

/// Row-by-row training driver with progress logging.
pub mod training;

/// Per-row scoring and aggregate precision / recall.
pub mod evaluation;
