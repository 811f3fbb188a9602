use std::collections::HashSet;
use std::path::Path;

use log::{debug, warn};
use rand::Rng;

use crate::error::Result;
use crate::io::read_corpus;
use super::frequency_table::FrequencyTable;
use super::generation_input::GenerationInput;
use super::probability_table::{ProbabilityTable, ZeroRowPolicy};
use super::sampler::Sampler;
use super::vocabulary::Vocabulary;

/// Build-time settings of a `BigramModel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelConfig {
	/// Handling of frequency rows that sum to zero.
	pub zero_row_policy: ZeroRowPolicy,
	/// Threads used to count transitions. `1` counts on the calling thread.
	pub workers: usize,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { zero_row_policy: ZeroRowPolicy::default(), workers: num_cpus::get() }
	}
}

/// A bigram model learned from a corpus of tokens.
///
/// This struct manages:
/// - `vocabulary`: symbol <-> index mapping, boundary at index 0
/// - `frequencies`: raw transition counts
/// - `probabilities`: row-normalized counts used for sampling
/// - `tokens`: the corpus tokens, used to avoid re-generating existing ones
///
/// Nothing is mutated after construction, so a model can be shared between
/// threads and sampled concurrently.
#[derive(Clone, Debug)]
pub struct BigramModel {
	vocabulary: Vocabulary,
	frequencies: FrequencyTable,
	probabilities: ProbabilityTable,
	tokens: HashSet<String>,
}

impl BigramModel {
	/// Reads a corpus file (one token per line) and builds the model.
	pub fn from_file<P: AsRef<Path>>(filepath: P, config: &ModelConfig) -> Result<Self> {
		let tokens = read_corpus(&filepath)?;
		debug!("read {} tokens from {}", tokens.len(), filepath.as_ref().display());
		Self::from_tokens(&tokens, config)
	}

	/// Builds vocabulary, frequency table and probability table, in that order.
	///
	/// # Errors
	/// - `EmptyCorpus` if `tokens` is empty
	/// - `ZeroRow` if a row sums to zero under `ZeroRowPolicy::Fail`
	pub fn from_tokens<S>(tokens: &[S], config: &ModelConfig) -> Result<Self>
	where
		S: AsRef<str> + Sync,
	{
		let vocabulary = Vocabulary::from_tokens(tokens)?;
		let frequencies = FrequencyTable::build_parallel(tokens, &vocabulary, config.workers)?;
		let probabilities = ProbabilityTable::from_frequencies(&frequencies, config.zero_row_policy)?;
		debug!(
			"built bigram model: {} tokens, V = {}, {} transitions",
			tokens.len(),
			vocabulary.size(),
			frequencies.total()
		);

		Ok(Self {
			vocabulary,
			frequencies,
			probabilities,
			tokens: tokens.iter().map(|t| t.as_ref().to_owned()).collect(),
		})
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn frequencies(&self) -> &FrequencyTable {
		&self.frequencies
	}

	pub fn probabilities(&self) -> &ProbabilityTable {
		&self.probabilities
	}

	/// Returns `true` if `token` is part of the corpus.
	pub fn contains(&self, token: &str) -> bool {
		self.tokens.contains(token)
	}

	/// Returns a sampler over this model using the cutoff of `input`.
	pub fn sampler(&self, input: &GenerationInput) -> Result<Sampler<'_>> {
		Ok(Sampler::new(&self.vocabulary, &self.probabilities)?.with_max_len(input.max_len()))
	}

	/// Generates a token, avoiding corpus tokens if possible.
	///
	/// # Behavior
	/// - Samples one token
	/// - While it already exists in the corpus and `nb_try` attempts remain,
	///   samples again
	/// - Returns the last attempt if every retry collides
	///
	/// # Errors
	/// Returns `SamplingDiverged` if a walk exceeds the cutoff.
	pub fn generate<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String> {
		let sampler = self.sampler(input)?;
		let mut token = sampler.sample(rng)?;

		let mut nb_try = input.nb_try;
		while nb_try > 0 && self.contains(&token) {
			token = sampler.sample(rng)?;
			nb_try -= 1;
		}
		if input.nb_try > 0 && self.contains(&token) {
			warn!("no new token after {} retries, returning {token:?}", input.nb_try);
		}

		Ok(token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::BigramError;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	fn sequential() -> ModelConfig {
		ModelConfig { workers: 1, ..ModelConfig::default() }
	}

	#[test]
	fn test_empty_corpus() {
		let tokens: Vec<String> = Vec::new();
		let err = BigramModel::from_tokens(&tokens, &sequential()).unwrap_err();
		assert!(matches!(err, BigramError::EmptyCorpus));
	}

	#[test]
	fn test_contains_corpus_tokens() {
		let model = BigramModel::from_tokens(&["ann", "bob"], &sequential()).unwrap();
		assert!(model.contains("ann"));
		assert!(!model.contains("an"));
	}

	#[test]
	fn test_generate_avoids_corpus_token() {
		// "a", "aba", "bab" and longer walks are new; corpus hits get retried.
		let model = BigramModel::from_tokens(&["ab", "b", "ba"], &sequential()).unwrap();
		let mut input = GenerationInput::default();
		input.nb_try = 1000;
		let mut rng = ChaCha8Rng::seed_from_u64(11);
		for _ in 0..20 {
			let token = model.generate(&input, &mut rng).unwrap();
			assert!(!model.contains(&token), "corpus token {token:?} returned");
		}
	}

	#[test]
	fn test_generate_returns_last_attempt_when_exhausted() {
		let model = BigramModel::from_tokens(&["xyz"], &sequential()).unwrap();
		let mut input = GenerationInput::default();
		input.nb_try = 3;
		let token = model.generate(&input, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
		assert_eq!(token, "xyz");
	}

	#[test]
	fn test_sampler_uses_input_cutoff() {
		let model = BigramModel::from_tokens(&["abc"], &sequential()).unwrap();
		let mut input = GenerationInput::default();
		input.set_max_len(Some(2)).unwrap();
		let err = model.generate(&input, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
		assert!(matches!(err, BigramError::SamplingDiverged { max_len: 2 }));
	}
}
