use super::BOUNDARY;
use super::trie::Trie;

impl Trie {
	/// Predicts whether a boundary follows `prefix`.
	///
	/// Longest context first: each suffix of `prefix`, from the whole prefix
	/// down to its last character, is walked from the root. The first suffix
	/// that walks completely and lands on a node whose strongest child has a
	/// positive frequency decides the answer: `true` iff that child is the
	/// boundary symbol. Without any such evidence the answer is `false`.
	pub fn predict(&self, prefix: &str) -> bool {
		let chars: Vec<char> = prefix.chars().collect();
		self.predict_chars(&chars)
	}

	/// Same as [`Trie::predict`] on an already decoded prefix.
	pub fn predict_chars(&self, prefix: &[char]) -> bool {
		// Suffixes longer than the deepest path cannot walk to completion.
		let first = prefix.len().saturating_sub(self.height());

		for start in first..prefix.len() {
			let Some(head) = self.walk(&prefix[start..]) else {
				continue;
			};
			if let Some((character, child)) = self.strongest_child(head) {
				if self.node(child).frequency() > 0 {
					return character == BOUNDARY;
				}
			}
		}
		false
	}

	/// Rebuilds `text` with a boundary inserted wherever one is predicted.
	///
	/// The context handed to the predictor is the output built so far, so
	/// boundaries already inserted (or present in `text`) count as context.
	/// Existing boundaries are kept as they are.
	pub fn segment(&self, text: &str) -> String {
		let mut prefix: Vec<char> = Vec::with_capacity(text.len() * 2);
		for c in text.chars() {
			if !prefix.is_empty() && c != BOUNDARY && self.predict_chars(&prefix) {
				prefix.push(BOUNDARY);
			}
			prefix.push(c);
		}
		prefix.into_iter().collect()
	}
}
