use log::info;

use super::trie::Trie;
use crate::config::TrainingConfig;
use crate::error::Result;
use crate::io::reverse_text;

/// Builds a trie from training rows, in input order.
///
/// # Behavior
/// - Each row is optionally reversed, then inserted with the configured depth.
/// - Progress is logged every `progress_interval` rows.
/// - The arena size is logged once all rows are in.
///
/// # Errors
/// The first failing row aborts training; nothing trained so far is returned.
pub fn train<I>(rows: I, config: &TrainingConfig) -> Result<Trie>
where
	I: IntoIterator<Item = Result<String>>,
{
	let mut trie = Trie::new();
	let mut count = 0;

	for row in rows {
		let row = row?;
		if config.reverse {
			trie.insert(&reverse_text(&row), config.depth());
		} else {
			trie.insert(&row, config.depth());
		}

		count += 1;
		if config.progress_interval > 0 && count % config.progress_interval == 0 {
			info!("{count}");
		}
	}

	info!("Trained on {count} rows, size: {}", trie.capacity());
	Ok(trie)
}

/// Prunes `trie` and logs the compaction ratio against the arena size.
pub fn prune_and_report(trie: &mut Trie) -> usize {
	let visited = trie.prune();
	let capacity = trie.capacity();
	let ratio = if capacity > 0 { visited as f64 / capacity as f64 } else { 0.0 };
	info!("Pruned to {visited} - {ratio:.6}");
	visited
}
