use std::io;

use thiserror::Error;

/// Errors produced by the Markov chain builder, model and generator.
///
/// Variants fall in three groups:
/// - caller contract violations (`InvalidOrder`, `EmptyRange`, `InvalidSetting`, `OrderMismatch`)
/// - internal invariant failures (`EmptyModel`, `MissingWindow`), which point at a bug
///   in ingestion rather than at bad input
/// - I/O failures while reading documents
#[derive(Debug, Error)]
pub enum MarkovError {
	/// Order must be at least 1.
	#[error("order must be >= 1, got {0}")]
	InvalidOrder(usize),

	/// A random draw was requested over an empty range.
	#[error("random bound must be > 0")]
	EmptyRange,

	/// A setting value is outside its accepted range or could not be parsed.
	#[error("invalid setting `{name}`: {message}")]
	InvalidSetting { name: &'static str, message: String },

	/// Two models with different orders cannot be merged.
	#[error("order mismatch: self={expected}, other={found}")]
	OrderMismatch { expected: usize, found: usize },

	/// Generation was attempted on a model that holds no window.
	#[error("model is empty, ingest at least one document first")]
	EmptyModel,

	/// The random walk reached a window that ingestion never recorded.
	#[error("window {window} does not exist in the model")]
	MissingWindow { window: String },

	/// A document could not be read.
	#[error("document io: {0}")]
	Io(#[from] io::Error),
}

impl MarkovError {
	/// Returns `true` for errors that indicate a bug in the model rather than bad input.
	pub fn is_invariant_failure(&self) -> bool {
		matches!(self, MarkovError::EmptyModel | MarkovError::MissingWindow { .. })
	}
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MarkovError>;
