use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, SegError};

/// Index of the text field in every input row.
pub const TEXT_FIELD: usize = 1;

/// Iterates over the text field of every CSV row in `reader`.
///
/// - No header row is expected
/// - All rows must have the same number of fields
/// - Other fields are ignored
///
/// The iterator ends cleanly at end of input; any other failure is yielded
/// as an error.
pub fn read_rows<R: Read>(reader: R) -> impl Iterator<Item = Result<String>> {
	csv::ReaderBuilder::new()
		.has_headers(false)
		.from_reader(reader)
		.into_records()
		.enumerate()
		.map(|(index, record)| {
			let record = record?;
			record
				.get(TEXT_FIELD)
				.map(str::to_owned)
				.ok_or(SegError::MissingField { row: index + 1 })
		})
}

/// Opens `path` and iterates over its rows (see [`read_rows`]).
pub fn open_rows<P: AsRef<Path>>(path: P) -> Result<impl Iterator<Item = Result<String>>> {
	let path = path.as_ref();
	let file = File::open(path).map_err(|source| SegError::Open { path: path.to_owned(), source })?;
	Ok(read_rows(BufReader::new(file)))
}

/// Reverses the character order of `text` (not its bytes).
pub fn reverse_text(text: &str) -> String {
	text.chars().rev().collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_field_is_extracted() {
		let input = "1,hello world,x\n2,\"quoted, text\",y\n";
		let rows: Vec<String> = read_rows(input.as_bytes()).collect::<Result<_>>().unwrap();
		assert_eq!(rows, vec!["hello world", "quoted, text"]);
	}

	#[test]
	fn short_row_is_reported() {
		let rows: Vec<Result<String>> = read_rows("only\n".as_bytes()).collect();
		assert!(matches!(rows[0], Err(SegError::MissingField { row: 1 })));
	}

	#[test]
	fn ragged_rows_are_an_error() {
		let rows: Vec<Result<String>> = read_rows("1,a\n2,b,c\n".as_bytes()).collect();
		assert!(rows[0].is_ok());
		assert!(matches!(rows[1], Err(SegError::Csv(_))));
	}

	#[test]
	fn empty_input_has_no_rows() {
		assert_eq!(read_rows("".as_bytes()).count(), 0);
	}

	#[test]
	fn reverse_is_character_aware() {
		assert_eq!(reverse_text("abc"), "cba");
		assert_eq!(reverse_text("été!"), "!été");
		assert_eq!(reverse_text(""), "");
	}
}
