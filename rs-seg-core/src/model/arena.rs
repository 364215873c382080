use std::collections::BTreeMap;

/// Number of nodes held by a single chunk.
pub const CHUNK_CAPACITY: usize = 1 << 16;

/// Stable handle to a node stored in an [`Arena`].
///
/// A handle encodes the chunk index and the slot inside that chunk, so it
/// resolves to the same node for as long as the arena lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	/// Handle reserved for a trie root, which is never stored in an arena.
	pub const ROOT: NodeId = NodeId(usize::MAX);

	fn new(chunk: usize, slot: usize) -> Self {
		Self(chunk * CHUNK_CAPACITY + slot)
	}

	fn chunk(self) -> usize {
		self.0 / CHUNK_CAPACITY
	}

	fn slot(self) -> usize {
		self.0 % CHUNK_CAPACITY
	}
}

/// A trie node: one character reached through a specific path.
///
/// # Invariants
/// - `children` is `None` until the first child is linked (lazy materialization)
/// - Child handles always point into the arena that issued this node
#[derive(Debug, Clone)]
pub struct Node {
	character: char,
	frequency: u64,
	children: Option<BTreeMap<char, NodeId>>,
}

impl Node {
	pub(crate) fn new(character: char) -> Self {
		Self { character, frequency: 0, children: None }
	}

	/// Symbol this node was reached by.
	pub fn character(&self) -> char {
		self.character
	}

	/// Training occurrences counted for the path ending here.
	pub fn frequency(&self) -> u64 {
		self.frequency
	}

	/// A leaf has never had a child linked.
	pub fn is_leaf(&self) -> bool {
		self.children.is_none()
	}

	/// Handle of the child labelled `character`, if linked.
	pub fn child(&self, character: char) -> Option<NodeId> {
		self.children.as_ref()?.get(&character).copied()
	}

	/// Children in ascending character order.
	pub fn children(&self) -> impl Iterator<Item = (char, NodeId)> + '_ {
		self.children.iter().flatten().map(|(&character, &id)| (character, id))
	}

	pub fn child_count(&self) -> usize {
		self.children.as_ref().map_or(0, BTreeMap::len)
	}

	pub(crate) fn increment(&mut self) {
		self.frequency += 1;
	}

	pub(crate) fn set_frequency(&mut self, frequency: u64) {
		self.frequency = frequency;
	}

	pub(crate) fn link(&mut self, character: char, child: NodeId) {
		self.children.get_or_insert_with(BTreeMap::new).insert(character, child);
	}

	/// Drops every child except `character -> child`.
	pub(crate) fn collapse_to(&mut self, character: char, child: NodeId) {
		self.children = Some(BTreeMap::from([(character, child)]));
	}
}

/// Fixed-capacity block of node storage.
///
/// The vector is reserved up front and never grows past [`CHUNK_CAPACITY`],
/// so its length doubles as the fill cursor.
#[derive(Debug)]
struct Chunk {
	nodes: Vec<Node>,
}

impl Chunk {
	fn new() -> Self {
		Self { nodes: Vec::with_capacity(CHUNK_CAPACITY) }
	}

	fn is_full(&self) -> bool {
		self.nodes.len() == CHUNK_CAPACITY
	}
}

/// Append-only node allocator.
///
/// # Responsibilities
/// - Hand out zero-initialized nodes from the current chunk
/// - Append a fresh chunk when the current one is full
/// - Resolve handles back to nodes
///
/// There is no way to free a single node; the whole arena goes away when it
/// is dropped.
#[derive(Debug, Default)]
pub struct Arena {
	chunks: Vec<Chunk>,
}

impl Arena {
	/// Creates an arena with no chunk; the first allocation adds one.
	pub fn new() -> Self {
		Self { chunks: Vec::new() }
	}

	/// Allocates a node for `character` with frequency 0 and no children.
	pub fn allocate(&mut self, character: char) -> NodeId {
		if self.chunks.last().is_none_or(Chunk::is_full) {
			self.chunks.push(Chunk::new());
		}
		let chunk_index = self.chunks.len() - 1;
		let chunk = &mut self.chunks[chunk_index];
		let slot = chunk.nodes.len();
		chunk.nodes.push(Node::new(character));
		NodeId::new(chunk_index, slot)
	}

	/// Resolves a handle issued by this arena.
	///
	/// # Panics
	/// Panics if `id` was not issued by this arena.
	pub fn get(&self, id: NodeId) -> &Node {
		&self.chunks[id.chunk()].nodes[id.slot()]
	}

	/// Mutable counterpart of [`Arena::get`], same panic rule.
	pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.chunks[id.chunk()].nodes[id.slot()]
	}

	/// Allocated capacity: `chunks * CHUNK_CAPACITY`, 0 before the first
	/// allocation.
	///
	/// This is what the training size report uses, and it is deliberately
	/// not the number of nodes in use (see [`Arena::len`]).
	pub fn capacity(&self) -> usize {
		self.chunks.len() * CHUNK_CAPACITY
	}

	/// Number of nodes handed out so far.
	pub fn len(&self) -> usize {
		self.chunks.iter().map(|chunk| chunk.nodes.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_arena_has_no_capacity() {
		let arena = Arena::new();
		assert_eq!(arena.capacity(), 0);
		assert!(arena.is_empty());
	}

	#[test]
	fn allocated_node_is_zeroed() {
		let mut arena = Arena::new();
		let id = arena.allocate('q');
		let node = arena.get(id);
		assert_eq!(node.character(), 'q');
		assert_eq!(node.frequency(), 0);
		assert!(node.is_leaf());
		assert_eq!(arena.capacity(), CHUNK_CAPACITY);
		assert_eq!(arena.len(), 1);
	}

	#[test]
	fn full_chunk_appends_new_one() {
		let mut arena = Arena::new();
		let first = arena.allocate('a');
		for _ in 1..CHUNK_CAPACITY {
			arena.allocate('b');
		}
		assert_eq!(arena.capacity(), CHUNK_CAPACITY);

		let overflow = arena.allocate('c');
		assert_eq!(arena.capacity(), 2 * CHUNK_CAPACITY);
		assert_eq!(arena.len(), CHUNK_CAPACITY + 1);

		// Handles issued before the new chunk still resolve.
		assert_eq!(arena.get(first).character(), 'a');
		assert_eq!(arena.get(overflow).character(), 'c');
	}

	#[test]
	fn children_iterate_in_character_order() {
		let mut arena = Arena::new();
		let parent = arena.allocate('p');
		for c in ['z', 'a', 'm'] {
			let child = arena.allocate(c);
			arena.get_mut(parent).link(c, child);
		}
		let order: Vec<char> = arena.get(parent).children().map(|(c, _)| c).collect();
		assert_eq!(order, vec!['a', 'm', 'z']);
		assert_eq!(arena.get(parent).child_count(), 3);
	}
}
