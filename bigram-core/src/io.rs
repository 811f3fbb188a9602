use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{BigramError, Result};

/// Reads a corpus file and returns one token per line.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Fails with `MalformedInput` on the first line that is not UTF-8
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let mut bytes = Vec::new();
	File::open(filename)?.read_to_end(&mut bytes)?;
	parse_corpus(bytes)
}

/// Splits raw corpus bytes into tokens.
///
/// A trailing line terminator does not produce an extra token, but interior
/// empty lines are kept as empty tokens.
pub fn parse_corpus(bytes: Vec<u8>) -> Result<Vec<String>> {
	let contents = String::from_utf8(bytes).map_err(|e| {
		let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
		let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
		BigramError::MalformedInput { line }
	})?;
	Ok(contents.lines().map(str::to_owned).collect())
}
