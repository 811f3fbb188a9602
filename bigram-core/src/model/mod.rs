//! Top-level module for the bigram generation system.
//!
//! Components, leaves first:
//! - Symbol/index mapping (`Vocabulary`)
//! - Transition counts (`FrequencyTable`)
//! - Row-normalized transitions (`ProbabilityTable`)
//! - Markov walk (`Sampler`)
//! - Everything above bundled together (`BigramModel`)

/// Symbol set derived from the corpus, boundary at index 0.
pub mod vocabulary;

/// Dense count matrix of padded bigrams.
///
/// Supports sequential and multi-threaded counting, and merging.
pub mod frequency_table;

/// Row-stochastic matrix and weighted draws.
pub mod probability_table;

/// Token generation by walking the probability table.
pub mod sampler;

/// Generation parameters (cutoff, novelty retries).
pub mod generation_input;

/// Model facade: build from a corpus, generate tokens.
pub mod bigram_model;
