use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, trace};

use crate::error::{MarkovError, Result};
use crate::io::read_document;
use super::granularity::Granularity;
use super::random::RandomSource;
use super::successors::Successors;
use super::window::{Window, NONWORD};

/// Markov chain under construction.
///
/// The builder is the only place the chain can be mutated. Documents are
/// streamed through a sliding window of `order` tokens and every
/// `(window, next token)` pair is recorded. Once all documents are in,
/// `build` freezes it into a `ChainModel` that can only be read.
///
/// # Responsibilities
/// - Ingest token streams, one document at a time
/// - Pad every document with sentinels at both ends
/// - Merge with another builder of the same order
///
/// # Invariants
/// - `order` is always >= 1
/// - Every key in `entries` has exactly `order` tokens
/// - Entries are append-only: lists are extended, never removed
#[derive(Clone, Debug)]
pub struct ChainBuilder {
	/// Number of tokens per window
	order: usize, // must be >= 1

	/// Window → observed successors, ordered by window
	entries: BTreeMap<Window, Successors>,

	/// How many observations landed on an already-known window
	multiples: usize,

	/// Number of ingested documents
	documents: usize,
}

impl ChainBuilder {
	/// Creates an empty builder of order `order`.
	///
	/// # Errors
	/// Returns `MarkovError::InvalidOrder` if `order == 0`.
	pub fn new(order: usize) -> Result<Self> {
		if order == 0 {
			return Err(MarkovError::InvalidOrder(order));
		}
		Ok(Self { order, entries: BTreeMap::new(), multiples: 0, documents: 0 })
	}

	/// Ingests one document given as a token stream.
	///
	/// The window restarts from all sentinels, so no context leaks between
	/// documents. An empty stream is recorded as a single sentinel. After the
	/// last token, `order` sentinels are fed to model the document's end.
	pub fn ingest<I, T>(&mut self, tokens: I)
	where
		I: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let mut window = Window::padded(self.order);
		let mut count = 0usize;

		for token in tokens {
			self.observe(&mut window, token.as_ref());
			count += 1;
		}
		if count == 0 {
			self.observe(&mut window, NONWORD);
		}

		// Flush trailing context
		for _ in 0..self.order {
			self.observe(&mut window, NONWORD);
		}

		self.documents += 1;
		debug!(
			"ingested document #{} ({} tokens), {} windows, {} multiples",
			self.documents,
			count,
			self.entries.len(),
			self.multiples
		);
	}

	/// Tokenizes `text` and ingests it as one document.
	pub fn ingest_text(&mut self, text: &str, granularity: Granularity) {
		self.ingest(granularity.tokenize(text));
	}

	/// Reads a file and ingests it as one document.
	///
	/// # Errors
	/// Returns `MarkovError::Io` if the file cannot be read as UTF-8. The builder is left untouched.
	pub fn ingest_file<P: AsRef<Path>>(&mut self, path: P, granularity: Granularity) -> Result<()> {
		let text = read_document(&path)?;
		debug!("read {} ({} bytes)", path.as_ref().display(), text.len());
		self.ingest_text(&text, granularity);
		Ok(())
	}

	/// Records `token` as a successor of `window`, then advances `window` by it.
	fn observe(&mut self, window: &mut Window, token: &str) {
		match self.entries.get_mut(window) {
			Some(successors) => {
				successors.push(token);
				self.multiples += 1;
			}
			None => {
				self.entries.insert(window.clone(), Successors::new(token));
			}
		}
		trace!("{window} -> {:?}", token);
		window.advance(token);
	}

	/// Merges another builder into this one.
	///
	/// # Notes
	/// - Both builders must have the same order.
	/// - Successor lists of shared windows are concatenated (self first).
	///
	/// # Errors
	/// Returns `MarkovError::OrderMismatch` if the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(MarkovError::OrderMismatch { expected: self.order, found: other.order });
		}

		for (window, successors) in &other.entries {
			if let Some(existing) = self.entries.get_mut(window) {
				existing.merge(successors);
				self.multiples += successors.len();
			} else {
				self.entries.insert(window.clone(), successors.clone());
				self.multiples += successors.len() - 1;
			}
		}
		self.documents += other.documents;

		Ok(())
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct windows recorded so far.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of documents ingested (merged builders included).
	pub fn documents(&self) -> usize {
		self.documents
	}

	/// Freezes the chain for generation.
	///
	/// # Errors
	/// Returns `MarkovError::EmptyModel` if nothing was ingested.
	pub fn build(self) -> Result<ChainModel> {
		if self.entries.is_empty() {
			return Err(MarkovError::EmptyModel);
		}
		debug!(
			"model ready: order {}, {} windows from {} documents",
			self.order,
			self.entries.len(),
			self.documents
		);
		Ok(ChainModel {
			order: self.order,
			entries: self.entries,
			multiples: self.multiples,
			documents: self.documents,
		})
	}
}

/// A frozen Markov chain, ready for generation.
///
/// Only obtainable from `ChainBuilder::build`, so it always holds at least
/// one window. Generation borrows it immutably.
#[derive(Clone, Debug)]
pub struct ChainModel {
	order: usize,
	entries: BTreeMap<Window, Successors>,
	multiples: usize,
	documents: usize,
}

impl ChainModel {
	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct windows.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn documents(&self) -> usize {
		self.documents
	}

	/// How many observations extended an already-known window during ingestion.
	pub fn multiples(&self) -> usize {
		self.multiples
	}

	/// Returns the successors recorded for `window`, if any.
	pub fn successors(&self, window: &Window) -> Option<&Successors> {
		self.entries.get(window)
	}

	/// Iterates over distinct windows in sorted order.
	pub fn windows(&self) -> impl Iterator<Item = &Window> {
		self.entries.keys()
	}

	/// Iterates over `(window, successors)` pairs in sorted window order.
	pub fn entries(&self) -> impl Iterator<Item = (&Window, &Successors)> {
		self.entries.iter()
	}

	/// Picks a window uniformly among the distinct windows.
	///
	/// Every window has the same chance regardless of how often it was
	/// observed during ingestion.
	///
	/// # Errors
	/// Returns `MarkovError::EmptyModel` if there is no window.
	pub fn random_window<R: RandomSource + ?Sized>(&self, random: &mut R) -> Result<&Window> {
		if self.entries.is_empty() {
			return Err(MarkovError::EmptyModel);
		}
		let index = random.next_int(self.entries.len())?;
		self.entries.keys().nth(index).ok_or(MarkovError::EmptyModel)
	}

	/// Builds a model from raw entries, bypassing ingestion.
	#[cfg(test)]
	pub(crate) fn from_parts(order: usize, entries: Vec<(Window, &str)>) -> Self {
		Self {
			order,
			entries: entries.into_iter().map(|(w, s)| (w, Successors::new(s))).collect(),
			multiples: 0,
			documents: 0,
		}
	}

	/// Human-readable listing of every window and its successors.
	///
	/// One `PREFIX {..}; SUFFIXES {..}` line per window, followed by the
	/// number of observations that extended an existing window.
	pub fn dump(&self) -> String {
		let mut lines: Vec<String> = self
			.entries
			.iter()
			.map(|(window, successors)| format!("PREFIX {window}; SUFFIXES {{{successors}}}"))
			.collect();
		lines.push(format!("pairs with multiple suffixes: {}", self.multiples));
		lines.join("\n")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn w(tokens: &[&str]) -> Window {
		Window::from_tokens(tokens.iter().copied())
	}

	fn successors_of<'a>(model: &'a ChainModel, tokens: &[&str]) -> Vec<&'a str> {
		model
			.successors(&w(tokens))
			.map(|s| s.as_slice().iter().map(String::as_str).collect())
			.unwrap_or_default()
	}

	#[test]
	fn zero_order_is_rejected() {
		assert!(matches!(ChainBuilder::new(0), Err(MarkovError::InvalidOrder(0))));
	}

	#[test]
	fn order_one_characters_aaab() {
		let mut builder = ChainBuilder::new(1).unwrap();
		builder.ingest_text("aaab", Granularity::Characters);
		let model = builder.build().unwrap();

		assert_eq!(model.len(), 3);
		assert_eq!(successors_of(&model, &[""]), ["a"]);
		assert_eq!(successors_of(&model, &["a"]), ["a", "a", "b"]);
		assert_eq!(successors_of(&model, &["b"]), [""]);
	}

	#[test]
	fn order_two_words_pads_both_ends() {
		let mut builder = ChainBuilder::new(2).unwrap();
		builder.ingest_text("the cat sat", Granularity::Words);
		let model = builder.build().unwrap();

		assert_eq!(successors_of(&model, &["", ""]), ["the"]);
		assert_eq!(successors_of(&model, &["", "the"]), ["cat"]);
		assert_eq!(successors_of(&model, &["the", "cat"]), ["sat"]);
		assert_eq!(successors_of(&model, &["cat", "sat"]), [""]);
		assert_eq!(successors_of(&model, &["sat", ""]), [""]);
		assert_eq!(model.len(), 5);
	}

	#[test]
	fn documents_restart_from_sentinels() {
		let mut builder = ChainBuilder::new(1).unwrap();
		builder.ingest(["a", "b"]);
		builder.ingest(["c"]);
		let model = builder.build().unwrap();

		assert_eq!(model.documents(), 2);
		assert_eq!(successors_of(&model, &[""]), ["a", "c"]);
		// no "b" -> "c" transition across documents
		assert_eq!(successors_of(&model, &["b"]), [""]);
	}

	#[test]
	fn empty_document_still_produces_a_window() {
		let mut builder = ChainBuilder::new(2).unwrap();
		builder.ingest_text("", Granularity::Words);
		let model = builder.build().unwrap();

		assert_eq!(model.len(), 1);
		assert_eq!(successors_of(&model, &["", ""]), ["", "", ""]);
	}

	#[test]
	fn build_without_ingestion_is_rejected() {
		let builder = ChainBuilder::new(3).unwrap();
		assert!(matches!(builder.build(), Err(MarkovError::EmptyModel)));
	}

	#[test]
	fn multiples_count_repeated_windows() {
		let mut builder = ChainBuilder::new(1).unwrap();
		builder.ingest(["a", "a", "a"]);
		let model = builder.build().unwrap();
		// [""]->a, ["a"]->a, ["a"]->a (multiple), ["a"]->"" (multiple)
		assert_eq!(model.multiples(), 2);
	}

	#[test]
	fn merge_concatenates_and_unions() {
		let mut left = ChainBuilder::new(1).unwrap();
		left.ingest(["x"]);
		let mut right = ChainBuilder::new(1).unwrap();
		right.ingest(["y"]);

		left.merge(&right).unwrap();
		let model = left.build().unwrap();
		assert_eq!(model.documents(), 2);
		assert_eq!(successors_of(&model, &[""]), ["x", "y"]);
		assert_eq!(successors_of(&model, &["y"]), [""]);
	}

	#[test]
	fn merge_matches_sequential_ingestion() {
		let mut sequential = ChainBuilder::new(2).unwrap();
		sequential.ingest_text("a b a b", Granularity::Words);
		sequential.ingest_text("b a", Granularity::Words);

		let mut first = ChainBuilder::new(2).unwrap();
		first.ingest_text("a b a b", Granularity::Words);
		let mut second = ChainBuilder::new(2).unwrap();
		second.ingest_text("b a", Granularity::Words);
		first.merge(&second).unwrap();

		let a = sequential.build().unwrap();
		let b = first.build().unwrap();
		assert_eq!(a.dump(), b.dump());
	}

	#[test]
	fn merge_rejects_order_mismatch() {
		let mut left = ChainBuilder::new(1).unwrap();
		let right = ChainBuilder::new(2).unwrap();
		assert!(matches!(
			left.merge(&right),
			Err(MarkovError::OrderMismatch { expected: 1, found: 2 })
		));
	}

	#[test]
	fn ingest_file_reads_document() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("doc.txt");
		std::fs::write(&path, "to be or not to be").unwrap();

		let mut builder = ChainBuilder::new(1).unwrap();
		builder.ingest_file(&path, Granularity::Words).unwrap();
		let model = builder.build().unwrap();
		assert_eq!(successors_of(&model, &["to"]), ["be", "be"]);
		assert_eq!(successors_of(&model, &["be"]), ["or", ""]);
	}

	#[test]
	fn ingest_file_missing_is_io_error() {
		let mut builder = ChainBuilder::new(1).unwrap();
		let result = builder.ingest_file("/nonexistent/markov_gen_missing.txt", Granularity::Words);
		assert!(matches!(result, Err(MarkovError::Io(_))));
		assert!(builder.is_empty());
		assert_eq!(builder.documents(), 0);
	}

	#[test]
	fn dump_lists_every_window() {
		let mut builder = ChainBuilder::new(1).unwrap();
		builder.ingest_text("ab", Granularity::Characters);
		let model = builder.build().unwrap();
		let dump = model.dump();

		assert_eq!(
			dump,
			"PREFIX {NONWORD}; SUFFIXES {a}\n\
			 PREFIX {a}; SUFFIXES {b}\n\
			 PREFIX {b}; SUFFIXES {NONWORD}\n\
			 pairs with multiple suffixes: 0"
		);
	}
}
