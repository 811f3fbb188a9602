use crate::error::{BigramError, Result};
use super::sampler::DEFAULT_MAX_LEN;

/// Parameters for generating tokens from a `BigramModel`.
///
/// # Responsibilities
/// - Track the sampling cutoff (`max_len`)
/// - Track how many times to re-sample a token already in the corpus (`nb_try`)
///
/// # Invariants
/// - `max_len` is either `None` (no cutoff) or strictly positive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationInput {
	/// Number of extra attempts when the generated token is a corpus token.
	/// `0` returns the first token drawn.
	pub nb_try: usize,

	/// Maximum number of symbols in a token before the walk is reported as diverged.
	max_len: Option<usize>,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self { nb_try: 0, max_len: Some(DEFAULT_MAX_LEN) }
	}
}

impl GenerationInput {
	pub fn max_len(&self) -> Option<usize> {
		self.max_len
	}

	/// Sets the cutoff.
	///
	/// # Errors
	/// Returns an error for `Some(0)`: every non-empty walk would diverge.
	pub fn set_max_len(&mut self, max_len: Option<usize>) -> Result<()> {
		if max_len == Some(0) {
			return Err(BigramError::InvalidInput("max_len must be at least 1".to_owned()));
		}
		self.max_len = max_len;
		Ok(())
	}
}
