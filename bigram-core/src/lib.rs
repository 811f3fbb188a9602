//! Bigram (first-order Markov) token generation library.
//!
//! This crate learns character transitions from a corpus of short tokens
//! (names) and generates new tokens from them:
//! - Vocabulary with a reserved boundary symbol
//! - Frequency and probability tables over symbol pairs
//! - A Markov-walk sampler with a length safety cutoff
//! - A heatmap report of the learned counts

/// Bigram model building blocks and the `BigramModel` facade.
pub mod model;

/// Corpus loading (one token per line).
pub mod io;

/// Error type shared by every stage.
pub mod error;

/// Diagnostic dump of the frequency table.
pub mod report;

pub use error::{BigramError, Result};
pub use model::bigram_model::{BigramModel, ModelConfig};
pub use model::generation_input::GenerationInput;
pub use model::probability_table::ZeroRowPolicy;
