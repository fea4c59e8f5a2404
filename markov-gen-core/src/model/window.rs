use std::collections::VecDeque;
use std::fmt;

/// A word or a single character, depending on the configured granularity.
pub type Token = String;

/// The empty token. Marks document boundaries and is never emitted by the generator.
pub const NONWORD: &str = "";

/// Returns `true` if `token` is the boundary sentinel.
pub fn is_sentinel(token: &str) -> bool {
	token == NONWORD
}

/// The trailing `order` tokens used as a lookup key in the chain.
///
/// A window always holds exactly `order` tokens. Advancing drops the oldest
/// token and appends the new one. Windows compare element-wise, in order, and
/// sort lexicographically.
///
/// # Invariants
/// - `tokens.len()` never changes after construction
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Window {
	tokens: VecDeque<Token>,
}

impl Window {
	/// Creates a window of `order` sentinels, the state at the start of every document.
	pub fn padded(order: usize) -> Self {
		Self { tokens: std::iter::repeat_n(NONWORD.to_owned(), order).collect() }
	}

	/// Creates a window from explicit tokens. Its order is the number of tokens given.
	pub fn from_tokens<I, T>(tokens: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<Token>,
	{
		Self { tokens: tokens.into_iter().map(Into::into).collect() }
	}

	/// Number of tokens held.
	pub fn order(&self) -> usize {
		self.tokens.len()
	}

	/// Drops the oldest token and appends `token`.
	pub fn advance(&mut self, token: &str) {
		if self.tokens.pop_front().is_some() {
			self.tokens.push_back(token.to_owned());
		}
	}

	/// Iterates over the tokens, oldest first.
	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(String::as_str)
	}
}

/// Renders as `{tok tok ...}`. The sentinel prints as `NONWORD` and control
/// characters are escaped so character-level windows stay on one line.
impl fmt::Display for Window {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("{")?;
		for (i, token) in self.tokens().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			write_token(f, token)?;
		}
		f.write_str("}")
	}
}

/// Writes one token for debug output.
pub(crate) fn write_token(f: &mut impl fmt::Write, token: &str) -> fmt::Result {
	if is_sentinel(token) {
		f.write_str("NONWORD")
	} else {
		write!(f, "{}", token.escape_debug())
	}
}
