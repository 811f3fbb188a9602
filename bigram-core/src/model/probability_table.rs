use log::warn;
use rand::Rng;

use crate::error::{BigramError, Result};
use super::frequency_table::FrequencyTable;

/// What to do with a frequency row that sums to zero.
///
/// Such a row belongs to a symbol never observed as a predecessor, which
/// cannot happen for a table built from its own corpus but can for
/// hand-built tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroRowPolicy {
	/// Refuse to build the table (`ZeroRow` error).
	#[default]
	Fail,
	/// Replace the row with the uniform distribution over all symbols.
	Uniform,
}

/// Row-stochastic version of a `FrequencyTable`.
///
/// Each row is a categorical distribution over the next symbol. A cumulative
/// copy of every row is kept so a draw is a binary search.
///
/// # Invariants
/// - Every row sums to 1.0 (within floating-point tolerance)
/// - `cumulative[row]` is non-decreasing and ends near 1.0
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityTable {
	size: usize,
	probabilities: Vec<f64>,
	cumulative: Vec<f64>,
}

impl ProbabilityTable {
	/// Normalizes each row of `frequencies` by its sum.
	///
	/// # Errors
	/// Returns `ZeroRow` for the first empty row when `policy` is `Fail`.
	pub fn from_frequencies(frequencies: &FrequencyTable, policy: ZeroRowPolicy) -> Result<Self> {
		let size = frequencies.size();
		let mut probabilities = Vec::with_capacity(size * size);

		for row in 0..size {
			let counts = frequencies.row(row);
			let sum = counts.iter().sum::<u64>() as f64;
			if sum == 0.0 {
				match policy {
					ZeroRowPolicy::Fail => return Err(BigramError::ZeroRow { row }),
					ZeroRowPolicy::Uniform => {
						warn!("row {row} has no observed transitions, using a uniform distribution");
						probabilities.extend(std::iter::repeat_n(1.0 / size as f64, size));
					}
				}
			} else {
				probabilities.extend(counts.iter().map(|count| *count as f64 / sum));
			}
		}

		let cumulative = probabilities
			.chunks(size.max(1))
			.flat_map(|row| {
				row.iter().scan(0.0, |acc, p| {
					*acc += p;
					Some(*acc)
				})
			})
			.collect();

		Ok(Self { size, probabilities, cumulative })
	}

	pub fn size(&self) -> usize {
		self.size
	}

	/// Probability of `prev -> next`.
	///
	/// # Panics
	/// Panics if either index is `>= size()`.
	pub fn probability(&self, prev: usize, next: usize) -> f64 {
		assert!(prev < self.size && next < self.size, "index ({prev}, {next}) out of {0}x{0}", self.size);
		self.probabilities[prev * self.size + next]
	}

	/// Distribution of the symbol following `prev`.
	///
	/// # Panics
	/// Panics if `prev >= size()`.
	pub fn row(&self, prev: usize) -> &[f64] {
		assert!(prev < self.size, "row {prev} out of {}", self.size);
		&self.probabilities[prev * self.size..(prev + 1) * self.size]
	}

	pub fn row_sum(&self, prev: usize) -> f64 {
		self.row(prev).iter().sum()
	}

	/// Draws the index following `prev`.
	///
	/// Uses a binary search on the cumulative row. An index with zero
	/// probability is never returned, even when rounding leaves the last
	/// cumulative value slightly below the drawn number.
	///
	/// # Panics
	/// Panics if `prev >= size()`.
	pub fn draw<R: Rng + ?Sized>(&self, prev: usize, rng: &mut R) -> usize {
		let row = self.row(prev);
		let cumulative = &self.cumulative[prev * self.size..(prev + 1) * self.size];

		let u = rng.random::<f64>() * cumulative[self.size - 1];
		let index = cumulative.partition_point(|c| *c <= u);
		if index < self.size {
			return index;
		}

		// u landed on the very top of the CDF: take the last symbol with mass.
		row.iter().rposition(|p| *p > 0.0).unwrap_or(self.size - 1)
	}
}
