use log::{debug, trace};

use crate::error::{MarkovError, Result};
use super::chain::ChainModel;
use super::granularity::Granularity;
use super::random::RandomSource;
use super::window::{is_sentinel, Token, Window};

/// State of one random walk over a frozen chain.
///
/// # Responsibilities
/// - Hold the current window between steps
/// - Sample the next token from the current window's successors
struct Walker<'m> {
	model: &'m ChainModel,
	current: Window,
}

impl<'m> Walker<'m> {
	/// Starts at a window drawn uniformly among the distinct windows.
	fn start<R: RandomSource + ?Sized>(model: &'m ChainModel, random: &mut R) -> Result<Self> {
		let current = model.random_window(random)?.clone();
		debug!("walk starts at {current}");
		Ok(Self { model, current })
	}

	/// Samples the successor of the current window and advances onto it.
	///
	/// # Errors
	/// Returns `MarkovError::MissingWindow` if the current window was never
	/// recorded. Ingestion guarantees every reachable window has at least one
	/// successor, so this indicates a bug.
	fn step<R: RandomSource + ?Sized>(&mut self, random: &mut R) -> Result<&'m str> {
		let model = self.model;
		let successors = model.successors(&self.current).ok_or_else(|| {
			MarkovError::MissingWindow { window: self.current.to_string() }
		})?;
		let token = successors.pick(random)?;
		trace!("{} -> {:?}", self.current, token);
		self.current.advance(token);
		Ok(token)
	}

	fn current(&self) -> &Window {
		&self.current
	}
}

impl ChainModel {
	/// Runs a random walk of `count` steps and returns the emitted tokens.
	///
	/// Sampled sentinels advance the window and count as a step but are not
	/// emitted, so the result holds at most `count` tokens.
	///
	/// # Errors
	/// - `MarkovError::EmptyModel` if the model has no window
	/// - `MarkovError::MissingWindow` if the walk reaches an unrecorded window
	pub fn walk<R: RandomSource + ?Sized>(&self, count: usize, random: &mut R) -> Result<Vec<Token>> {
		let mut tokens = Vec::with_capacity(count);
		if count == 0 {
			return Ok(tokens);
		}

		let mut walker = Walker::start(self, random)?;
		let mut sentinels = 0usize;
		for _ in 0..count {
			let token = walker.step(random)?;
			if is_sentinel(token) {
				sentinels += 1;
			} else {
				tokens.push(token.to_owned());
			}
		}

		debug!(
			"walk of {} steps emitted {} tokens ({} sentinels), ended at {}",
			count,
			tokens.len(),
			sentinels,
			walker.current()
		);
		Ok(tokens)
	}

	/// Generates text: a `count`-step walk joined per `granularity`.
	///
	/// Words are joined with single spaces, characters are concatenated.
	/// The model is not modified; only `random` advances.
	///
	/// # Errors
	/// See `walk`.
	pub fn generate<R: RandomSource + ?Sized>(
		&self,
		count: usize,
		granularity: Granularity,
		random: &mut R,
	) -> Result<String> {
		let tokens = self.walk(count, random)?;
		Ok(granularity.join(&tokens))
	}
}
