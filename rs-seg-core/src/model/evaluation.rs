use log::info;

use super::BOUNDARY;
use super::trie::Trie;
use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::io::reverse_text;

/// Outcome of scoring one labeled row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowScore {
	/// Predicted boundaries that were real.
	pub wins: usize,
	/// Predicted boundaries that were not.
	pub fails: usize,
	/// Real boundaries in the row.
	pub real: usize,
	/// One decision per scanned character, in the row's original order.
	/// A forward scan decides characters `1..n`; a reversed scan, flipped
	/// back, decides characters `0..n-1`. Empty unless requested.
	pub decisions: Vec<bool>,
}

impl RowScore {
	/// `wins / (wins + fails)`, undefined when nothing was predicted.
	pub fn precision(&self) -> Option<f64> {
		let predicted = self.wins + self.fails;
		(predicted > 0).then(|| self.wins as f64 / predicted as f64)
	}

	/// `wins / real`, undefined for rows without boundaries.
	pub fn recall(&self) -> Option<f64> {
		(self.real > 0).then(|| self.wins as f64 / self.real as f64)
	}

	/// Decisions rendered as a line of `0`/`1`.
	pub fn decision_line(&self) -> String {
		self.decisions.iter().map(|&split| if split { '1' } else { '0' }).collect()
	}
}

/// Scores `text` against the model.
///
/// The prefix handed to the predictor is the model's own segmentation of the
/// row: every real character is appended, and a boundary is appended after a
/// positive decision that the row does not already carry.
pub fn score_row(trie: &Trie, text: &str) -> RowScore {
	let mut score = RowScore::default();
	let mut chars = text.chars();
	let Some(first) = chars.next() else {
		return score;
	};

	let mut prefix = vec![first];
	for c in chars {
		let split = trie.predict_chars(&prefix);
		if split {
			if c == BOUNDARY {
				score.wins += 1;
			} else {
				score.fails += 1;
			}
		}
		if c == BOUNDARY {
			score.real += 1;
		}
		if split && c != BOUNDARY {
			prefix.push(BOUNDARY);
		}
		prefix.push(c);
		score.decisions.push(split);
	}
	score
}

/// Running precision and recall over many rows.
///
/// Undefined per-row values are skipped when summing, but every row counts
/// in the denominator of the reported averages.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
	rows: usize,
	precision_sum: f64,
	recall_sum: f64,
	wins: usize,
	fails: usize,
	real: usize,
}

impl Metrics {
	pub fn add(&mut self, score: &RowScore) {
		self.rows += 1;
		if let Some(precision) = score.precision() {
			self.precision_sum += precision;
		}
		if let Some(recall) = score.recall() {
			self.recall_sum += recall;
		}
		self.wins += score.wins;
		self.fails += score.fails;
		self.real += score.real;
	}

	pub fn rows(&self) -> usize {
		self.rows
	}

	pub fn precision(&self) -> f64 {
		if self.rows == 0 { 0.0 } else { self.precision_sum / self.rows as f64 }
	}

	pub fn recall(&self) -> f64 {
		if self.rows == 0 { 0.0 } else { self.recall_sum / self.rows as f64 }
	}

	/// Totals over all rows: `(wins, fails, real)`.
	pub fn totals(&self) -> (usize, usize, usize) {
		(self.wins, self.fails, self.real)
	}
}

/// Scores every row and returns the aggregate metrics.
///
/// `on_row` sees each row score as soon as it is computed, which lets callers
/// stream decision lines without keeping them around.
///
/// # Errors
/// The first failing row aborts the evaluation.
pub fn evaluate<I, F>(trie: &Trie, rows: I, config: &EvaluationConfig, mut on_row: F) -> Result<Metrics>
where
	I: IntoIterator<Item = Result<String>>,
	F: FnMut(&RowScore),
{
	let mut metrics = Metrics::default();

	for row in rows {
		let row = row?;
		let mut score = if config.reverse {
			let mut score = score_row(trie, &reverse_text(&row));
			score.decisions.reverse();
			score
		} else {
			score_row(trie, &row)
		};
		if !config.emit_decisions {
			score.decisions.clear();
		}

		metrics.add(&score);
		on_row(&score);

		if config.progress_interval > 0 && metrics.rows() % config.progress_interval == 0 {
			info!("{} {:.6} {:.6}", metrics.rows(), metrics.precision(), metrics.recall());
		}
	}

	Ok(metrics)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn trained(rows: &[&str], depth: usize) -> Trie {
		let mut trie = Trie::new();
		for row in rows {
			trie.insert(row, depth);
		}
		trie
	}

	#[test]
	fn perfect_row() {
		let trie = trained(&["ab cd", "ab ce"], 2);
		let score = score_row(&trie, "ab cd");
		assert_eq!(score.wins, 1);
		assert_eq!(score.fails, 0);
		assert_eq!(score.real, 1);
		assert_eq!(score.precision(), Some(1.0));
		assert_eq!(score.recall(), Some(1.0));
		assert_eq!(score.decision_line(), "0100");
	}

	#[test]
	fn undefined_ratios_are_none() {
		let trie = Trie::new();
		let score = score_row(&trie, "abc");
		assert_eq!(score.precision(), None);
		assert_eq!(score.recall(), None);
		assert_eq!(score.decisions, vec![false, false]);

		let empty = score_row(&trie, "");
		assert_eq!(empty, RowScore::default());
	}

	#[test]
	fn false_positive_extends_prefix_with_boundary() {
		// The model always splits after "a", so "ab" is scored as "a b".
		let trie = trained(&["a b", "a c"], 1);
		let score = score_row(&trie, "ab");
		assert_eq!(score.fails, 1);
		assert_eq!(score.real, 0);
		assert_eq!(score.precision(), Some(0.0));
		assert_eq!(score.recall(), None);
	}

	#[test]
	fn metrics_average_over_all_rows() {
		let mut metrics = Metrics::default();
		metrics.add(&RowScore { wins: 1, fails: 1, real: 2, decisions: vec![] });
		metrics.add(&RowScore { wins: 0, fails: 0, real: 0, decisions: vec![] });
		assert_eq!(metrics.rows(), 2);
		assert!((metrics.precision() - 0.25).abs() < 1e-12);
		assert!((metrics.recall() - 0.25).abs() < 1e-12);
		assert_eq!(metrics.totals(), (1, 1, 2));

		assert_eq!(Metrics::default().precision(), 0.0);
	}

	#[test]
	fn reversed_decisions_are_realigned() {
		// Reversed model: "dc ba" style suffix statistics.
		let trie = trained(&["dc ba", "ec ba"], 2);
		let config = EvaluationConfig { reverse: true, emit_decisions: true, progress_interval: 0 };
		let mut lines = Vec::new();
		let metrics = evaluate(&trie, vec![Ok("ab cd".to_owned())], &config, |score| lines.push(score.decision_line())).unwrap();

		// The reversed scan of "dc ba" flags its space; flipped back, digit i
		// refers to character i of "ab cd", so the space is digit 2.
		assert_eq!(lines, vec!["0010".to_owned()]);
		assert_eq!(metrics.precision(), 1.0);
	}

	#[test]
	fn decisions_are_dropped_unless_requested() {
		let trie = trained(&["ab cd"], 2);
		let config = EvaluationConfig { progress_interval: 0, ..EvaluationConfig::default() };
		let mut seen = Vec::new();
		evaluate(&trie, vec![Ok("ab cd".to_owned())], &config, |score| seen.push(score.decisions.len())).unwrap();
		assert_eq!(seen, vec![0]);
	}
}
