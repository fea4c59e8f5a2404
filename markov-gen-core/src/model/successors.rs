use std::fmt;

use crate::error::Result;
use super::random::RandomSource;
use super::window::{write_token, Token};

/// The tokens observed to follow one window.
///
/// Conceptually, this is the set of outgoing edges of a node in the Markov
/// chain. Edges are not counted: every observation is stored, so a token seen
/// twice is twice as likely to be picked.
///
/// ## Responsibilities:
/// - Accumulate observations during ingestion, in arrival order
/// - Pick the next token uniformly over stored observations
/// - Absorb the observations of another list (model merging)
///
/// ## Invariants
/// - Never empty once created through `Successors::new`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Successors {
	tokens: Vec<Token>,
}

impl Successors {
	/// Creates a list holding one observation.
	pub fn new(first: &str) -> Self {
		Self { tokens: vec![first.to_owned()] }
	}

	/// Records one more observation of `token`.
	pub fn push(&mut self, token: &str) {
		self.tokens.push(token.to_owned());
	}

	/// Picks one stored observation uniformly at random.
	///
	/// # Errors
	/// Propagates `MarkovError::EmptyRange` from the source if the list is empty.
	pub fn pick<R: RandomSource + ?Sized>(&self, random: &mut R) -> Result<&str> {
		let index = random.next_int(self.tokens.len())?;
		Ok(self.tokens[index].as_str())
	}

	/// Appends every observation of `other`, keeping its order.
	pub fn merge(&mut self, other: &Self) {
		self.tokens.extend(other.tokens.iter().cloned());
	}

	/// Number of stored observations, duplicates included.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Stored observations in arrival order.
	pub fn as_slice(&self) -> &[Token] {
		&self.tokens
	}
}

/// Renders as `a, b, NONWORD`.
impl fmt::Display for Successors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, token) in self.tokens.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write_token(f, token)?;
		}
		Ok(())
	}
}
