use super::trie::Trie;

impl Trie {
	/// Compacts the trie in place.
	///
	/// Walks the trie depth-first with an explicit stack. A node whose
	/// children are all leaves keeps only its highest-frequency child (ties
	/// go to the lowest character); any other node has its children pushed
	/// for further traversal. Only the arg-max child is ever consulted by
	/// the predictor, so its decisions are unchanged.
	///
	/// Discarded nodes stay in the arena, so [`Trie::capacity`] does not
	/// shrink.
	///
	/// # Returns
	/// The number of visited nodes, counting a collapse as one extra visit.
	/// Only meant for the compaction ratio in the training log.
	pub fn prune(&mut self) -> usize {
		let mut stack = vec![self.root()];
		let mut visited = 0;

		while let Some(id) = stack.pop() {
			visited += 1;
			let node = self.node(id);
			if node.is_leaf() {
				continue;
			}

			if node.children().all(|(_, child)| self.node(child).is_leaf()) {
				if let Some((character, child)) = self.strongest_child(id) {
					self.node_mut(id).collapse_to(character, child);
				}
				visited += 1;
			} else {
				stack.extend(node.children().map(|(_, child)| child));
			}
		}

		visited
	}
}

#[cfg(test)]
mod tests {
	use crate::model::serializer::Subtree;
	use crate::model::trie::Trie;

	fn trained(rows: &[&str], depth: usize) -> Trie {
		let mut trie = Trie::new();
		for row in rows {
			trie.insert(row, depth);
		}
		trie
	}

	#[test]
	fn all_leaf_siblings_keep_the_strongest() {
		let mut trie = trained(&["ab", "ac", "ac", "ad"], 1);
		let before = trie.node_count();
		trie.prune();

		let a = trie.lookup("a").unwrap();
		assert_eq!(a.child_count(), 1);
		assert!(trie.lookup("ac").is_some());
		assert!(trie.lookup("ab").is_none());
		assert!(trie.node_count() < before);
	}

	#[test]
	fn mixed_children_are_descended_not_collapsed() {
		// 'a' has a leaf child 'x' and an inner child 'b'.
		let mut trie = trained(&["ax", "abc", "abd", "abd"], 2);
		trie.prune();

		let a = trie.lookup("a").unwrap();
		assert!(a.child_count() >= 2);
		assert_eq!(trie.lookup("ab").unwrap().child_count(), 1);
		assert!(trie.lookup("abd").is_some());
		assert!(trie.lookup("abc").is_none());
	}

	#[test]
	fn ties_resolve_to_lowest_character() {
		let mut trie = trained(&["qz", "qa", "qm"], 1);
		trie.prune();
		let q = trie.lookup("q").unwrap();
		assert_eq!(q.children().map(|(c, _)| c).collect::<Vec<_>>(), vec!['a']);
	}

	#[test]
	fn pruning_is_idempotent() {
		let mut trie = trained(&["the cat sat", "the hat", "a cat ran", "then"], 3);
		trie.prune();
		let once = Subtree::capture(&trie, trie.root());
		let count_once = trie.node_count();

		trie.prune();
		assert_eq!(Subtree::capture(&trie, trie.root()), once);
		assert_eq!(trie.node_count(), count_once);
	}

	#[test]
	fn visit_count_includes_collapses() {
		// root -> a -> {b, c}: root visited, 'a' visited and collapsed.
		let mut trie = trained(&["ab", "ac"], 1);
		assert_eq!(trie.prune(), 3);
	}

	#[test]
	fn empty_trie_visits_root_only() {
		let mut trie = Trie::new();
		assert_eq!(trie.prune(), 1);
	}

	#[test]
	fn prediction_survives_pruning() {
		let mut trie = trained(&["ab cd", "ab ce", "ab cf", "abx"], 2);
		let before = trie.predict("ab");
		trie.prune();
		assert_eq!(trie.predict("ab"), before);
		assert!(trie.predict("ab"));
	}
}
