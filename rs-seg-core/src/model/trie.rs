use super::arena::{Arena, Node, NodeId};

/// Character n-gram frequency trie backed by an [`Arena`].
///
/// The trie grows by sliding windows of increasing length across each
/// training string, so a single structure holds statistics for every context
/// length up to the training depth.
///
/// # Responsibilities
/// - Own the arena and the root node
/// - Ingest training strings (`insert`)
/// - Provide walks and arg-max lookups for the predictor and the pruning pass
///
/// # Invariants
/// - The root is the empty-prefix node and is never a child of anything
/// - The root lives outside the arena, so an untrained trie has no capacity
/// - `height` is at least the length of the longest root path
#[derive(Debug)]
pub struct Trie {
	arena: Arena,
	root: Node,
	height: usize,
}

impl Default for Trie {
	fn default() -> Self {
		Self::new()
	}
}

impl Trie {
	/// Creates an empty trie. No arena chunk is allocated until the first
	/// node below the root is created.
	pub fn new() -> Self {
		Self { arena: Arena::new(), root: Node::new('\0'), height: 0 }
	}

	/// Handle of the empty-prefix root node.
	pub fn root(&self) -> NodeId {
		NodeId::ROOT
	}

	/// Resolves a handle issued by this trie (the root included).
	///
	/// # Panics
	/// Panics if `id` belongs to another trie's arena and is out of range.
	pub fn node(&self, id: NodeId) -> &Node {
		if id == NodeId::ROOT { &self.root } else { self.arena.get(id) }
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
		if id == NodeId::ROOT { &mut self.root } else { self.arena.get_mut(id) }
	}

	/// Allocates a fresh node from the arena.
	pub(crate) fn allocate(&mut self, character: char) -> NodeId {
		self.arena.allocate(character)
	}

	/// Allocated arena capacity (see [`Arena::capacity`]).
	pub fn capacity(&self) -> usize {
		self.arena.capacity()
	}

	/// Length of the longest path ever created from the root.
	pub fn height(&self) -> usize {
		self.height
	}

	pub(crate) fn raise_height(&mut self, depth: usize) {
		self.height = self.height.max(depth);
	}

	/// Adds one training string.
	///
	/// For each window length `d` in `1..=max_depth`, every window of `d + 1`
	/// characters is walked from the root and its final node is incremented.
	/// The first time no window fits (`len <= d`) the whole text is inserted
	/// once instead, incrementing every node on its path. Deeper windows
	/// cannot fit either, so the loop stops there.
	///
	/// # Notes
	/// - Works on `char`s, not bytes.
	/// - `max_depth == 0` inserts nothing.
	pub fn insert(&mut self, text: &str, max_depth: usize) {
		let chars: Vec<char> = text.chars().collect();

		for depth in 1..=max_depth {
			if chars.len() <= depth {
				self.insert_full(&chars);
				break;
			}

			for end in depth..chars.len() {
				let mut head = NodeId::ROOT;
				for &c in &chars[end - depth..=end] {
					head = self.child_or_insert(head, c);
				}
				self.node_mut(head).increment();
			}
			self.raise_height(depth + 1);
		}
	}

	/// Inserts `chars` from the root, counting every node on the path.
	fn insert_full(&mut self, chars: &[char]) {
		let mut head = NodeId::ROOT;
		for &c in chars {
			head = self.child_or_insert(head, c);
			self.node_mut(head).increment();
		}
		self.raise_height(chars.len());
	}

	/// Returns the child of `parent` labelled `character`, allocating it
	/// first if it does not exist yet.
	fn child_or_insert(&mut self, parent: NodeId, character: char) -> NodeId {
		if let Some(child) = self.node(parent).child(character) {
			return child;
		}
		let child = self.arena.allocate(character);
		self.node_mut(parent).link(character, child);
		child
	}

	/// Child of `parent` labelled `character`, if any.
	pub fn child(&self, parent: NodeId, character: char) -> Option<NodeId> {
		self.node(parent).child(character)
	}

	/// Follows `path` from the root.
	///
	/// Returns `None` at the first character with no matching child.
	pub fn walk(&self, path: &[char]) -> Option<NodeId> {
		path.iter().try_fold(NodeId::ROOT, |head, &c| self.child(head, c))
	}

	/// Convenience wrapper around [`Trie::walk`] for string paths.
	pub fn lookup(&self, path: &str) -> Option<&Node> {
		let chars: Vec<char> = path.chars().collect();
		self.walk(&chars).map(|id| self.node(id))
	}

	/// Highest-frequency child of `id`.
	///
	/// Children are visited in ascending character order and only a strictly
	/// greater frequency replaces the current best, so ties resolve to the
	/// lowest character. Zero-frequency children can be returned; callers
	/// decide what a zero maximum means.
	pub fn strongest_child(&self, id: NodeId) -> Option<(char, NodeId)> {
		let mut best: Option<(char, NodeId, u64)> = None;
		for (character, child) in self.node(id).children() {
			let frequency = self.node(child).frequency();
			if best.is_none_or(|(_, _, max)| frequency > max) {
				best = Some((character, child, frequency));
			}
		}
		best.map(|(character, child, _)| (character, child))
	}

	/// Direct children of the root, in ascending character order.
	pub fn top_level(&self) -> impl Iterator<Item = (char, NodeId)> + '_ {
		self.root.children()
	}

	/// Number of nodes reachable from the root, root included.
	///
	/// Unlike [`Trie::capacity`], nodes discarded by pruning are not counted.
	pub fn node_count(&self) -> usize {
		let mut stack = vec![NodeId::ROOT];
		let mut count = 0;
		while let Some(id) = stack.pop() {
			count += 1;
			stack.extend(self.node(id).children().map(|(_, child)| child));
		}
		count
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::arena::CHUNK_CAPACITY;

	fn frequency(trie: &Trie, path: &str) -> Option<u64> {
		trie.lookup(path).map(Node::frequency)
	}

	#[test]
	fn shared_windows_accumulate() {
		let mut trie = Trie::new();
		trie.insert("ab cd", 2);
		trie.insert("ab ce", 2);

		assert_eq!(frequency(&trie, "ab "), Some(2));
		assert_eq!(frequency(&trie, "ab"), Some(2));
		assert_eq!(frequency(&trie, " cd"), Some(1));
		assert_eq!(frequency(&trie, " ce"), Some(1));
		// Window walks only count their final node.
		assert_eq!(frequency(&trie, "a"), Some(0));
		assert_eq!(trie.height(), 3);
	}

	#[test]
	fn short_text_gets_single_full_pass() {
		let mut trie = Trie::new();
		trie.insert("xyz", 5);

		// One count from the full pass only; a pass per depth would give 3.
		assert_eq!(frequency(&trie, "x"), Some(1));
		// Window "xy" (depth 1) plus the full pass.
		assert_eq!(frequency(&trie, "xy"), Some(2));
		// Window "xyz" (depth 2) plus the full pass.
		assert_eq!(frequency(&trie, "xyz"), Some(2));
		assert_eq!(frequency(&trie, "yz"), Some(1));
		assert_eq!(trie.height(), 3);
	}

	#[test]
	fn exact_fit_falls_back_once() {
		let mut trie = Trie::new();
		trie.insert("ab", 1);
		// "ab" is a depth-1 window; no fallback happens at depth 1.
		assert_eq!(frequency(&trie, "a"), Some(0));
		assert_eq!(frequency(&trie, "ab"), Some(1));

		let mut trie = Trie::new();
		trie.insert("ab", 2);
		assert_eq!(frequency(&trie, "a"), Some(1));
		assert_eq!(frequency(&trie, "ab"), Some(2));
	}

	#[test]
	fn single_character_and_empty_text() {
		let mut trie = Trie::new();
		trie.insert("", 3);
		assert_eq!(trie.node_count(), 1);

		trie.insert("k", 3);
		assert_eq!(frequency(&trie, "k"), Some(1));
		assert_eq!(trie.node_count(), 2);
	}

	#[test]
	fn zero_depth_inserts_nothing() {
		let mut trie = Trie::new();
		trie.insert("hello", 0);
		assert!(trie.node(trie.root()).is_leaf());
	}

	#[test]
	fn multibyte_characters_are_single_symbols() {
		let mut trie = Trie::new();
		trie.insert("été", 1);
		assert_eq!(frequency(&trie, "ét"), Some(1));
		assert_eq!(frequency(&trie, "té"), Some(1));
	}

	#[test]
	fn untrained_trie_reports_no_capacity() {
		let mut trie = Trie::new();
		assert_eq!(trie.capacity(), 0);

		trie.insert("ab", 1);
		assert_eq!(trie.capacity(), CHUNK_CAPACITY);
		assert_eq!(trie.node_count(), 3);
	}

	#[test]
	fn walk_stops_at_missing_child() {
		let mut trie = Trie::new();
		trie.insert("abc", 2);
		assert!(trie.walk(&['a', 'b', 'c']).is_some());
		assert!(trie.walk(&['a', 'x', 'c']).is_none());
		assert_eq!(trie.walk(&[]), Some(trie.root()));
	}

	#[test]
	fn strongest_child_breaks_ties_by_character() {
		let mut trie = Trie::new();
		trie.insert("ab", 1);
		trie.insert("ac", 1);
		trie.insert("ad", 1);
		trie.insert("ad", 1);
		let a = trie.walk(&['a']).unwrap();
		assert_eq!(trie.strongest_child(a).map(|(c, _)| c), Some('d'));

		let mut trie = Trie::new();
		trie.insert("az", 1);
		trie.insert("am", 1);
		let a = trie.walk(&['a']).unwrap();
		assert_eq!(trie.strongest_child(a).map(|(c, _)| c), Some('m'));
	}

	#[test]
	fn top_level_is_sorted() {
		let mut trie = Trie::new();
		trie.insert("cab", 1);
		let top: Vec<char> = trie.top_level().map(|(c, _)| c).collect();
		assert_eq!(top, vec!['a', 'c']);
	}
}
