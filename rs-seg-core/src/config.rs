use crate::error::{Result, SegError};
use crate::model::serializer::MAX_MODEL_DEPTH;

/// Rows between two progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

/// Parameters for a training run.
///
/// # Invariants
/// - `depth` is always >= 1
/// - `depth + 1` never exceeds [`MAX_MODEL_DEPTH`], so a trained model can
///   always be saved
pub struct TrainingConfig {
	/// Maximum window depth; windows span `depth + 1` characters.
	depth: usize,

	/// Reverse every row before insertion (suffix-oriented model).
	pub reverse: bool,

	/// Log progress every `progress_interval` rows, 0 disables it.
	pub progress_interval: usize,
}

impl TrainingConfig {
	/// # Errors
	/// Returns an error if `depth` is 0 or too deep to save.
	pub fn new(depth: usize) -> Result<Self> {
		let mut config = Self {
			depth: 1,
			reverse: false,
			progress_interval: DEFAULT_PROGRESS_INTERVAL,
		};
		config.set_depth(depth)?;
		Ok(config)
	}

	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn set_depth(&mut self, depth: usize) -> Result<()> {
		if depth == 0 {
			return Err(SegError::Config("depth must be >= 1".to_owned()));
		}
		if depth >= MAX_MODEL_DEPTH {
			return Err(SegError::Config(format!("depth must be < {MAX_MODEL_DEPTH}")));
		}
		self.depth = depth;
		Ok(())
	}
}

/// Parameters for an evaluation run.
pub struct EvaluationConfig {
	/// Reverse every row before scoring. Must match the training run.
	pub reverse: bool,

	/// Keep per-position decisions on each row score.
	pub emit_decisions: bool,

	pub progress_interval: usize,
}

impl Default for EvaluationConfig {
	fn default() -> Self {
		Self {
			reverse: false,
			emit_decisions: false,
			progress_interval: DEFAULT_PROGRESS_INTERVAL,
		}
	}
}
