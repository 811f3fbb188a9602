use log::trace;
use rand::Rng;

use crate::error::{BigramError, Result};
use super::probability_table::ProbabilityTable;
use super::vocabulary::{Symbol, Vocabulary, BOUNDARY_INDEX};

/// Default safety cutoff on the length of a generated token.
pub const DEFAULT_MAX_LEN: usize = 256;

/// Markov walk over a `ProbabilityTable`.
///
/// The walk starts at the boundary, draws the next symbol from the row of the
/// current one, and stops as soon as the boundary is drawn again. Symbols
/// drawn in between, in order, form the generated token.
///
/// A `Sampler` only borrows the model; several samplers may read the same
/// tables from different threads, each with its own random source.
#[derive(Clone, Copy, Debug)]
pub struct Sampler<'a> {
	vocabulary: &'a Vocabulary,
	table: &'a ProbabilityTable,
	max_len: Option<usize>,
}

impl<'a> Sampler<'a> {
	/// Creates a sampler with the default cutoff.
	///
	/// # Errors
	/// Returns `ShapeMismatch` if `table` was not built for `vocabulary`.
	pub fn new(vocabulary: &'a Vocabulary, table: &'a ProbabilityTable) -> Result<Self> {
		if vocabulary.size() != table.size() {
			return Err(BigramError::ShapeMismatch { stage: "sampler", expected: vocabulary.size(), found: table.size() });
		}
		Ok(Self { vocabulary, table, max_len: Some(DEFAULT_MAX_LEN) })
	}

	/// Sets the cutoff. `None` walks until the boundary, however long it takes.
	pub fn with_max_len(mut self, max_len: Option<usize>) -> Self {
		self.max_len = max_len;
		self
	}

	pub fn max_len(&self) -> Option<usize> {
		self.max_len
	}

	/// Walks the chain once and returns the visited indices, boundary excluded.
	///
	/// # Errors
	/// Returns `SamplingDiverged` if more than `max_len` symbols are drawn
	/// without reaching the boundary.
	pub fn sample_indices<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<usize>> {
		let mut indices = Vec::new();
		let mut state = BOUNDARY_INDEX;

		loop {
			state = self.table.draw(state, rng);
			if state == BOUNDARY_INDEX {
				break;
			}
			if let Some(max_len) = self.max_len {
				if indices.len() >= max_len {
					return Err(BigramError::SamplingDiverged { max_len });
				}
			}
			indices.push(state);
		}

		trace!("walk ended after {} symbols", indices.len());
		Ok(indices)
	}

	/// Generates one token.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
		let indices = self.sample_indices(rng)?;
		let token = indices
			.into_iter()
			.filter_map(|index| match self.vocabulary.symbol(index) {
				Some(Symbol::Char(c)) => Some(c),
				_ => None,
			})
			.collect();
		Ok(token)
	}

	/// Generates `count` tokens from the same random stream.
	pub fn sample_many<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<String>> {
		(0..count).map(|_| self.sample(rng)).collect()
	}
}
