use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use super::arena::NodeId;
use super::trie::Trie;
use crate::error::{Result, SegError};

/// Deepest subtree nesting a model stream may carry.
///
/// A trie trained with depth `d` is at most `d + 1` levels deep, so this
/// also bounds the training depth. Decoding rejects anything deeper instead
/// of recursing without limit.
pub const MAX_MODEL_DEPTH: usize = 512;

/// Owned, decoded form of a trie subtree.
///
/// This is what a model stream decodes into before being attached to a
/// fresh trie. It is also handy for comparing two tries structurally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subtree {
	character: char,
	frequency: u64,
	children: Vec<Subtree>,
}

impl Subtree {
	/// Builds a subtree by hand, e.g. to seed [`Trie::from_subtrees`].
	pub fn new(character: char, frequency: u64, children: Vec<Subtree>) -> Self {
		Self { character, frequency, children }
	}

	/// Copies the subtree rooted at `id`, children in character order.
	pub fn capture(trie: &Trie, id: NodeId) -> Self {
		let node = trie.node(id);
		Self {
			character: node.character(),
			frequency: node.frequency(),
			children: node.children().map(|(_, child)| Self::capture(trie, child)).collect(),
		}
	}
}

/// Borrowed view of an arena subtree, encoded with the same layout as
/// [`Subtree`] so the writer never builds an owned copy of the model.
struct SubtreeView<'a> {
	trie: &'a Trie,
	id: NodeId,
}

impl Serialize for SubtreeView<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let node = self.trie.node(self.id);
		let mut state = serializer.serialize_struct("Subtree", 3)?;
		state.serialize_field("character", &node.character())?;
		state.serialize_field("frequency", &node.frequency())?;
		state.serialize_field("children", &ChildrenView { trie: self.trie, id: self.id })?;
		state.end()
	}
}

struct ChildrenView<'a> {
	trie: &'a Trie,
	id: NodeId,
}

impl Serialize for ChildrenView<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let node = self.trie.node(self.id);
		// postcard needs the length up front
		let mut seq = serializer.serialize_seq(Some(node.child_count()))?;
		for (_, child) in node.children() {
			seq.serialize_element(&SubtreeView { trie: self.trie, id: child })?;
		}
		seq.end()
	}
}

/// Decodes one [`Subtree`] at nesting level `depth` (1 for a record).
struct SubtreeSeed {
	depth: usize,
}

impl<'de> DeserializeSeed<'de> for SubtreeSeed {
	type Value = Subtree;

	fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Subtree, D::Error> {
		if self.depth > MAX_MODEL_DEPTH {
			return Err(de::Error::custom(format_args!("subtree nested deeper than {MAX_MODEL_DEPTH} levels")));
		}
		deserializer.deserialize_struct("Subtree", &["character", "frequency", "children"], self)
	}
}

impl<'de> Visitor<'de> for SubtreeSeed {
	type Value = Subtree;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a subtree record")
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Subtree, A::Error> {
		let character = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
		let frequency = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
		let children = seq
			.next_element_seed(ChildrenSeed { depth: self.depth })?
			.ok_or_else(|| de::Error::invalid_length(2, &self))?;
		Ok(Subtree { character, frequency, children })
	}
}

/// Decodes the children list of a subtree at nesting level `depth`.
struct ChildrenSeed {
	depth: usize,
}

impl<'de> DeserializeSeed<'de> for ChildrenSeed {
	type Value = Vec<Subtree>;

	fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Vec<Subtree>, D::Error> {
		deserializer.deserialize_seq(self)
	}
}

impl<'de> Visitor<'de> for ChildrenSeed {
	type Value = Vec<Subtree>;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a list of subtrees")
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Vec<Subtree>, A::Error> {
		// The announced length comes from the stream; do not trust it for allocation.
		let mut children = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(64));
		while let Some(child) = seq.next_element_seed(SubtreeSeed { depth: self.depth + 1 })? {
			children.push(child);
		}
		Ok(children)
	}
}

/// Decodes one top-level subtree from the front of `bytes`.
fn take_subtree(bytes: &[u8]) -> Result<(Subtree, &[u8])> {
	let mut deserializer = postcard::Deserializer::from_bytes(bytes);
	let subtree = SubtreeSeed { depth: 1 }.deserialize(&mut deserializer)?;
	Ok((subtree, deserializer.finalize()?))
}

impl Trie {
	/// Writes the model as a stream of `(character, subtree)` records, one
	/// per direct child of the root, in ascending character order.
	///
	/// The stream carries no record count: readers stop at end of input.
	///
	/// # Errors
	/// Fails with [`SegError::TooDeep`] when the trie is deeper than
	/// [`MAX_MODEL_DEPTH`], since such a stream could not be loaded back.
	pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
		if self.height() > MAX_MODEL_DEPTH {
			return Err(SegError::TooDeep { height: self.height(), limit: MAX_MODEL_DEPTH });
		}
		for (character, id) in self.top_level() {
			postcard::to_io(&character, &mut writer)?;
			postcard::to_io(&SubtreeView { trie: self, id }, &mut writer)?;
		}
		writer.flush()?;
		Ok(())
	}

	/// Reads a model written by [`Trie::save`] until end of input.
	pub fn load<R: Read>(mut reader: R) -> Result<Self> {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;
		Self::from_bytes(&bytes)
	}

	/// Decodes records until `bytes` is exhausted.
	///
	/// Running out of bytes between records is the normal end of the
	/// stream; running out inside a record, or nesting deeper than
	/// [`MAX_MODEL_DEPTH`], is a decode error.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let mut trie = Self::new();
		let mut rest = bytes;
		while !rest.is_empty() {
			let (character, tail): (char, &[u8]) = postcard::take_from_bytes(rest)?;
			let (subtree, tail) = take_subtree(tail)?;
			trie.attach(character, subtree);
			rest = tail;
		}
		Ok(trie)
	}

	/// Builds a trie whose root has exactly the given labelled subtrees.
	/// A repeated label replaces the earlier subtree.
	pub fn from_subtrees<I>(subtrees: I) -> Self
	where
		I: IntoIterator<Item = (char, Subtree)>,
	{
		let mut trie = Self::new();
		for (character, subtree) in subtrees {
			trie.attach(character, subtree);
		}
		trie
	}

	/// Copies `subtree` into the arena as the root's child `label`.
	fn attach(&mut self, label: char, subtree: Subtree) {
		let mut pending = vec![(self.root(), label, subtree, 1)];
		while let Some((parent, label, subtree, depth)) = pending.pop() {
			let id = self.allocate(subtree.character);
			self.node_mut(id).set_frequency(subtree.frequency);
			self.node_mut(parent).link(label, id);
			self.raise_height(depth);
			pending.extend(
				subtree
					.children
					.into_iter()
					.map(|child| (id, child.character, child, depth + 1)),
			);
		}
	}

	/// [`Trie::save`] into a newly created (or truncated) file.
	pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let file = File::create(path).map_err(|source| SegError::Open { path: path.to_owned(), source })?;
		self.save(BufWriter::new(file))
	}

	/// [`Trie::load`] from a file.
	pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let file = File::open(path).map_err(|source| SegError::Open { path: path.to_owned(), source })?;
		Self::load(BufReader::new(file))
	}
}
