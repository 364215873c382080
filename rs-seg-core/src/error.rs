use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while training, loading or scoring a boundary model.
///
/// Clean end of input (rows or model stream) is never an error; everything
/// listed here is fatal for the run that hit it.
#[derive(Error, Debug)]
pub enum SegError {
	/// A file could not be opened.
	#[error("Cannot open {}: {source}", path.display())]
	Open {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error(transparent)]
	Io(#[from] io::Error),

	/// A row could not be read or did not match the expected shape.
	#[error("Reading rows: {0}")]
	Csv(#[from] csv::Error),

	/// A row has no text field (index 1). `row` is 1-based.
	#[error("Row {row} has no text field")]
	MissingField { row: usize },

	/// The model stream could not be encoded or decoded.
	#[error("Model stream: {0}")]
	Codec(#[from] postcard::Error),

	/// The trie is deeper than the model stream can carry.
	#[error("Model is {height} levels deep, streams are limited to {limit}")]
	TooDeep { height: usize, limit: usize },

	#[error("Invalid configuration: {0}")]
	Config(String),
}

pub type Result<T> = std::result::Result<T, SegError>;
