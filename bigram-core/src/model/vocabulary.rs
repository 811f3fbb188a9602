use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::{BigramError, Result};

/// Index reserved for the boundary symbol.
pub const BOUNDARY_INDEX: usize = 0;

/// Label used for the boundary symbol in reports.
pub const BOUNDARY_LABEL: char = '^';

/// One symbol of the model alphabet.
///
/// The boundary marks both the start and the end of a token. It is kept apart
/// from corpus characters, so a corpus may itself contain `^`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
	Boundary,
	Char(char),
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Symbol::Boundary => write!(f, "{BOUNDARY_LABEL}"),
			Symbol::Char(c) => write!(f, "{c}"),
		}
	}
}

/// Bidirectional mapping between symbols and dense indices.
///
/// # Invariants
/// - The boundary symbol is always at `BOUNDARY_INDEX` (0)
/// - Corpus characters are sorted and occupy indices `1..size()`
/// - The mapping never changes after construction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
	/// Sorted unique corpus characters; `alphabet[i]` has index `i + 1`.
	alphabet: Vec<char>,
	indices: HashMap<char, usize>,
}

impl Vocabulary {
	/// Derives the vocabulary from a corpus.
	///
	/// # Errors
	/// Returns `EmptyCorpus` if `tokens` is empty.
	pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
		if tokens.is_empty() {
			return Err(BigramError::EmptyCorpus);
		}

		let alphabet: Vec<char> = tokens
			.iter()
			.flat_map(|token| token.as_ref().chars())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect();

		let indices = alphabet
			.iter()
			.enumerate()
			.map(|(i, c)| (*c, i + 1))
			.collect();

		Ok(Self { alphabet, indices })
	}

	/// Number of symbols, boundary included.
	pub fn size(&self) -> usize {
		self.alphabet.len() + 1
	}

	/// Corpus characters in index order.
	pub fn alphabet(&self) -> &[char] {
		&self.alphabet
	}

	pub fn char_index(&self, c: char) -> Option<usize> {
		self.indices.get(&c).copied()
	}

	pub fn index_of(&self, symbol: Symbol) -> Option<usize> {
		match symbol {
			Symbol::Boundary => Some(BOUNDARY_INDEX),
			Symbol::Char(c) => self.char_index(c),
		}
	}

	/// Returns the symbol stored at `index`, or `None` if out of range.
	pub fn symbol(&self, index: usize) -> Option<Symbol> {
		if index == BOUNDARY_INDEX {
			return Some(Symbol::Boundary);
		}
		self.alphabet.get(index - 1).map(|c| Symbol::Char(*c))
	}

	/// Display label for `index` (`^` for the boundary).
	pub fn label(&self, index: usize) -> Option<char> {
		self.symbol(index).map(|symbol| match symbol {
			Symbol::Boundary => BOUNDARY_LABEL,
			Symbol::Char(c) => c,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_corpus_fails() {
		let tokens: Vec<String> = Vec::new();
		assert!(matches!(Vocabulary::from_tokens(&tokens), Err(BigramError::EmptyCorpus)));
	}

	#[test]
	fn test_sorted_indices_after_boundary() {
		let vocab = Vocabulary::from_tokens(&["cab", "bad"]).unwrap();
		assert_eq!(vocab.size(), 5);
		assert_eq!(vocab.alphabet(), &['a', 'b', 'c', 'd']);
		assert_eq!(vocab.index_of(Symbol::Boundary), Some(BOUNDARY_INDEX));
		assert_eq!(vocab.char_index('a'), Some(1));
		assert_eq!(vocab.char_index('d'), Some(4));
		assert_eq!(vocab.char_index('z'), None);
	}

	#[test]
	fn test_symbol_round_trip() {
		let vocab = Vocabulary::from_tokens(&["xy"]).unwrap();
		for index in 0..vocab.size() {
			let symbol = vocab.symbol(index).unwrap();
			assert_eq!(vocab.index_of(symbol), Some(index));
		}
		assert_eq!(vocab.symbol(vocab.size()), None);
	}

	#[test]
	fn test_order_independent() {
		let a = Vocabulary::from_tokens(&["ann", "bob"]).unwrap();
		let b = Vocabulary::from_tokens(&["bob", "ann"]).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn test_only_empty_tokens() {
		let vocab = Vocabulary::from_tokens(&[""]).unwrap();
		assert_eq!(vocab.size(), 1);
		assert_eq!(vocab.label(0), Some('^'));
	}

	#[test]
	fn test_corpus_caret_is_a_regular_char() {
		let vocab = Vocabulary::from_tokens(&["a^"]).unwrap();
		assert_eq!(vocab.size(), 3);
		assert_eq!(vocab.index_of(Symbol::Char('^')), Some(1));
		assert_eq!(vocab.symbol(1), Some(Symbol::Char('^')));
		assert_eq!(vocab.symbol(0), Some(Symbol::Boundary));
	}
}
