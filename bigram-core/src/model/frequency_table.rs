use std::sync::mpsc;
use std::thread;

use log::debug;

use crate::error::{BigramError, Result};
use super::vocabulary::{Vocabulary, BOUNDARY_INDEX};

/// Dense `V x V` matrix of observed bigram counts.
///
/// Cell `(prev, next)` holds how many times `next` followed `prev` in the
/// corpus, with every token padded by the boundary symbol on both sides.
///
/// ## Responsibilities:
/// - Count transitions from a corpus, sequentially or across threads
/// - Merge partial tables built from disjoint chunks of the corpus
///
/// ## Invariants
/// - `counts.len() == size * size`, stored row-major
/// - Every symbol seen as a predecessor has a row sum >= 1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
	size: usize,
	counts: Vec<u64>,
}

impl FrequencyTable {
	/// Creates an all-zero table for a vocabulary of `size` symbols.
	pub fn zeros(size: usize) -> Self {
		Self { size, counts: vec![0; size * size] }
	}

	/// Wraps hand-built row-major counts.
	///
	/// # Errors
	/// Returns `ShapeMismatch` if `counts` does not hold `size * size` cells.
	pub fn from_counts(size: usize, counts: Vec<u64>) -> Result<Self> {
		if counts.len() != size * size {
			return Err(BigramError::ShapeMismatch { stage: "frequency table", expected: size * size, found: counts.len() });
		}
		Ok(Self { size, counts })
	}

	/// Counts every padded bigram of `tokens`.
	///
	/// Each token contributes `^ -> first`, the inner pairs, and
	/// `last -> ^`. An empty token contributes a single `^ -> ^`.
	///
	/// # Errors
	/// Returns `UnknownSymbol` if a token holds a character missing from
	/// `vocabulary`.
	pub fn build<S: AsRef<str>>(tokens: &[S], vocabulary: &Vocabulary) -> Result<Self> {
		let mut table = Self::zeros(vocabulary.size());
		for token in tokens {
			table.add_token(token.as_ref(), vocabulary)?;
		}
		debug!("counted {} transitions over {} tokens (V = {})", table.total(), tokens.len(), table.size);
		Ok(table)
	}

	/// Same result as `build`, with the corpus split across `workers` threads.
	///
	/// # Behavior
	/// - Splits tokens into chunks (workers * factor)
	/// - Counts each chunk on its own scoped thread
	/// - Merges the partial tables (addition is commutative, so the result
	///   does not depend on completion order)
	pub fn build_parallel<S>(tokens: &[S], vocabulary: &Vocabulary, workers: usize) -> Result<Self>
	where
		S: AsRef<str> + Sync,
	{
		let workers = workers.max(1);
		if workers == 1 || tokens.len() < workers {
			return Self::build(tokens, vocabulary);
		}

		let factor = 4;
		let chunks = workers * factor;
		let chunk_size = tokens.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in tokens.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					// The receiver outlives the scope, so a failed send is unreachable.
					let _ = tx.send(Self::build(chunk, vocabulary));
				});
			}
		});
		drop(tx);

		let mut table = Self::zeros(vocabulary.size());
		let mut merged = 0;
		for partial in rx.iter() {
			table.merge(&partial?)?;
			merged += 1;
		}
		debug!("merged {merged} partial tables ({workers} workers)");
		Ok(table)
	}

	fn add_token(&mut self, token: &str, vocabulary: &Vocabulary) -> Result<()> {
		let mut prev = BOUNDARY_INDEX;
		for c in token.chars() {
			let next = vocabulary.char_index(c).ok_or(BigramError::UnknownSymbol(c))?;
			self.counts[prev * self.size + next] += 1;
			prev = next;
		}
		self.counts[prev * self.size + BOUNDARY_INDEX] += 1;
		Ok(())
	}

	/// Adds the counts of `other` into this table.
	///
	/// # Errors
	/// Returns `ShapeMismatch` if both tables do not share the same size.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.size != other.size {
			return Err(BigramError::ShapeMismatch { stage: "frequency table", expected: self.size, found: other.size });
		}
		for (count, extra) in self.counts.iter_mut().zip(&other.counts) {
			*count += extra;
		}
		Ok(())
	}

	/// Number of symbols per side.
	pub fn size(&self) -> usize {
		self.size
	}

	/// Count of `prev -> next`.
	///
	/// # Panics
	/// Panics if either index is `>= size()`.
	pub fn count(&self, prev: usize, next: usize) -> u64 {
		assert!(prev < self.size && next < self.size, "index ({prev}, {next}) out of {0}x{0}", self.size);
		self.counts[prev * self.size + next]
	}

	/// Outgoing counts of `prev`.
	///
	/// # Panics
	/// Panics if `prev >= size()`.
	pub fn row(&self, prev: usize) -> &[u64] {
		assert!(prev < self.size, "row {prev} out of {}", self.size);
		&self.counts[prev * self.size..(prev + 1) * self.size]
	}

	pub fn row_sum(&self, prev: usize) -> u64 {
		self.row(prev).iter().sum()
	}

	/// Total number of counted transitions.
	pub fn total(&self) -> u64 {
		self.counts.iter().sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table_for(tokens: &[&str]) -> (Vocabulary, FrequencyTable) {
		let vocab = Vocabulary::from_tokens(tokens).unwrap();
		let table = FrequencyTable::build(tokens, &vocab).unwrap();
		(vocab, table)
	}

	#[test]
	fn test_single_token_ab() {
		let (vocab, table) = table_for(&["ab"]);
		let a = vocab.char_index('a').unwrap();
		let b = vocab.char_index('b').unwrap();

		assert_eq!(table.count(BOUNDARY_INDEX, a), 1);
		assert_eq!(table.count(a, b), 1);
		assert_eq!(table.count(b, BOUNDARY_INDEX), 1);
		assert_eq!(table.total(), 3);
	}

	#[test]
	fn test_empty_token_is_boundary_self_loop() {
		let (_, table) = table_for(&[""]);
		assert_eq!(table.size(), 1);
		assert_eq!(table.count(BOUNDARY_INDEX, BOUNDARY_INDEX), 1);
		assert_eq!(table.total(), 1);
	}

	#[test]
	fn test_repeated_chars_and_row_sums() {
		let (vocab, table) = table_for(&["anna", "ann"]);
		let a = vocab.char_index('a').unwrap();
		let n = vocab.char_index('n').unwrap();

		assert_eq!(table.count(BOUNDARY_INDEX, a), 2);
		assert_eq!(table.count(a, n), 2);
		assert_eq!(table.count(n, n), 2);
		assert_eq!(table.count(n, a), 1);
		assert_eq!(table.count(a, BOUNDARY_INDEX), 1);
		assert_eq!(table.count(n, BOUNDARY_INDEX), 1);
		assert_eq!(table.row_sum(BOUNDARY_INDEX), 2);
		assert_eq!(table.row_sum(a), 3);
		assert_eq!(table.row_sum(n), 4);
	}

	#[test]
	fn test_unknown_symbol() {
		let vocab = Vocabulary::from_tokens(&["ab"]).unwrap();
		let err = FrequencyTable::build(&["abc"], &vocab).unwrap_err();
		assert!(matches!(err, BigramError::UnknownSymbol('c')));
	}

	#[test]
	fn test_parallel_matches_sequential() {
		let tokens: Vec<String> = (0..500)
			.map(|i| format!("n{}x{}", i % 7, i % 13))
			.collect();
		let vocab = Vocabulary::from_tokens(&tokens).unwrap();
		let sequential = FrequencyTable::build(&tokens, &vocab).unwrap();
		let parallel = FrequencyTable::build_parallel(&tokens, &vocab, 4).unwrap();
		assert_eq!(sequential, parallel);
	}

	#[test]
	fn test_merge_shape_mismatch() {
		let mut a = FrequencyTable::zeros(2);
		let b = FrequencyTable::zeros(3);
		assert!(matches!(a.merge(&b), Err(BigramError::ShapeMismatch { expected: 2, found: 3, .. })));
	}

	#[test]
	fn test_from_counts_checks_len() {
		assert!(FrequencyTable::from_counts(2, vec![1, 2, 3]).is_err());
		let table = FrequencyTable::from_counts(2, vec![1, 2, 3, 4]).unwrap();
		assert_eq!(table.row(1), &[3, 4]);
	}

	#[test]
	#[should_panic]
	fn test_count_out_of_bounds() {
		FrequencyTable::zeros(2).count(2, 0);
	}
}
