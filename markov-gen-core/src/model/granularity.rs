use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarkovError;

/// Unit of text the chain is built over.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
	/// Whitespace-delimited words. Output is joined with single spaces.
	#[default]
	#[serde(alias = "word")]
	Words,
	/// One Unicode scalar value per token, whitespace included. Output is concatenated.
	#[serde(alias = "character", alias = "chars")]
	Characters,
}

impl Granularity {
	/// Splits `text` into tokens.
	///
	/// Tokens borrow from `text`; nothing is copied until ingestion stores them.
	pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
		match self {
			Granularity::Words => text.split_whitespace().collect(),
			Granularity::Characters => text
				.char_indices()
				.map(|(i, c)| &text[i..i + c.len_utf8()])
				.collect(),
		}
	}

	/// Joins generated tokens back into text.
	pub fn join<S: AsRef<str>>(&self, tokens: &[S]) -> String {
		let separator = match self {
			Granularity::Words => " ",
			Granularity::Characters => "",
		};
		let mut output = String::new();
		for (i, token) in tokens.iter().enumerate() {
			if i > 0 {
				output.push_str(separator);
			}
			output.push_str(token.as_ref());
		}
		output
	}
}

impl FromStr for Granularity {
	type Err = MarkovError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"words" | "word" => Ok(Granularity::Words),
			"characters" | "character" | "chars" => Ok(Granularity::Characters),
			other => Err(MarkovError::InvalidSetting {
				name: "granularity",
				message: format!("expected 'words' or 'characters', got '{other}'"),
			}),
		}
	}
}

impl fmt::Display for Granularity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Granularity::Words => f.write_str("words"),
			Granularity::Characters => f.write_str("characters"),
		}
	}
}
