use thiserror::Error;

/// Errors raised while loading a corpus, building the model, or sampling.
///
/// Every message starts with the stage that failed so a caller can report
/// it as-is.
#[derive(Error, Debug)]
pub enum BigramError {
	#[error("corpus: line {line} is not valid UTF-8")]
	MalformedInput { line: usize },

	#[error("corpus: {0}")]
	Io(#[from] std::io::Error),

	#[error("vocabulary: corpus contains no tokens")]
	EmptyCorpus,

	#[error("frequency table: symbol {0:?} is not part of the vocabulary")]
	UnknownSymbol(char),

	#[error("probability table: row {row} has no observed transitions")]
	ZeroRow { row: usize },

	#[error("{stage}: shape mismatch, expected {expected}, found {found}")]
	ShapeMismatch { stage: &'static str, expected: usize, found: usize },

	#[error("sampler: no boundary drawn within {max_len} symbols")]
	SamplingDiverged { max_len: usize },

	#[error("config: {0}")]
	InvalidInput(String),

	#[error("report: {0}")]
	Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BigramError>;
