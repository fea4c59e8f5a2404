use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{MarkovError, Result};
use super::granularity::Granularity;
use super::random::Random;

/// Accepted chain orders.
pub const ORDER_RANGE: RangeInclusive<usize> = 1..=20;

/// Accepted number of generation steps.
pub const COUNT_RANGE: RangeInclusive<usize> = 1..=9999;

pub const DEFAULT_ORDER: usize = 2;
pub const DEFAULT_COUNT: usize = 100;

/// How the random source of a generation run is seeded.
///
/// # Variants
/// - `Clock`: fresh entropy seed, a different walk each run. The seed is
///   still reported by `Random::seed_value`.
/// - `Fixed(u64)`: explicit seed, the same walk for the same model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedPolicy {
	#[default]
	Clock,
	Fixed(u64),
}

impl SeedPolicy {
	/// Creates a random source according to the policy.
	pub fn random(&self) -> Random {
		match self {
			SeedPolicy::Clock => Random::seed(),
			SeedPolicy::Fixed(seed) => Random::with_seed(*seed),
		}
	}
}

impl FromStr for SeedPolicy {
	type Err = MarkovError;

	/// Parses `"clock"` (case-insensitive) or an unsigned integer.
	fn from_str(s: &str) -> Result<Self> {
		let s = s.trim();
		if s.eq_ignore_ascii_case("clock") {
			return Ok(SeedPolicy::Clock);
		}
		s.parse::<u64>().map(SeedPolicy::Fixed).map_err(|_| MarkovError::InvalidSetting {
			name: "seed",
			message: format!("expected 'clock' or an unsigned integer, got '{s}'"),
		})
	}
}

impl fmt::Display for SeedPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SeedPolicy::Clock => f.write_str("clock"),
			SeedPolicy::Fixed(seed) => write!(f, "{seed}"),
		}
	}
}

/// Parameters of one build-then-generate run.
///
/// Stores the chain order, the number of walk steps, the token granularity
/// and the seeding policy. Values are validated on every setter, so a
/// `Settings` always holds values within `ORDER_RANGE` and `COUNT_RANGE`.
///
/// Settings are passed explicitly to whoever needs them; there is no
/// process-wide copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
	/// Tokens per window.
	order: usize,

	/// Number of walk steps (sentinels included).
	count: usize,

	/// Word or character tokens.
	pub granularity: Granularity,

	/// Seeding of the random source.
	pub seed: SeedPolicy,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			order: DEFAULT_ORDER,
			count: DEFAULT_COUNT,
			granularity: Granularity::Words,
			seed: SeedPolicy::Clock,
		}
	}
}

impl Settings {
	pub fn order(&self) -> usize {
		self.order
	}

	pub fn count(&self) -> usize {
		self.count
	}

	/// Sets the chain order.
	///
	/// # Errors
	/// Returns `MarkovError::InvalidSetting` if `order` is outside `ORDER_RANGE`.
	pub fn set_order(&mut self, order: usize) -> Result<()> {
		check_range("order", order, &ORDER_RANGE)?;
		self.order = order;
		Ok(())
	}

	/// Sets the number of walk steps.
	///
	/// # Errors
	/// Returns `MarkovError::InvalidSetting` if `count` is outside `COUNT_RANGE`.
	pub fn set_count(&mut self, count: usize) -> Result<()> {
		check_range("count", count, &COUNT_RANGE)?;
		self.count = count;
		Ok(())
	}
}

fn check_range(name: &'static str, value: usize, range: &RangeInclusive<usize>) -> Result<()> {
	if !range.contains(&value) {
		return Err(MarkovError::InvalidSetting {
			name,
			message: format!("must be between {} and {}, got {}", range.start(), range.end(), value),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::random::RandomSource;

	#[test]
	fn defaults() {
		let s = Settings::default();
		assert_eq!(s.order(), 2);
		assert_eq!(s.count(), 100);
		assert_eq!(s.granularity, Granularity::Words);
		assert_eq!(s.seed, SeedPolicy::Clock);
	}

	#[test]
	fn order_bounds() {
		let mut s = Settings::default();
		assert!(s.set_order(0).is_err());
		assert!(s.set_order(21).is_err());
		assert_eq!(s.order(), 2, "rejected value leaves setting unchanged");
		s.set_order(20).unwrap();
		assert_eq!(s.order(), 20);
		s.set_order(1).unwrap();
		assert_eq!(s.order(), 1);
	}

	#[test]
	fn count_bounds() {
		let mut s = Settings::default();
		assert!(s.set_count(0).is_err());
		assert!(s.set_count(10_000).is_err());
		s.set_count(9999).unwrap();
		assert_eq!(s.count(), 9999);
	}

	#[test]
	fn invalid_setting_names_the_field() {
		let mut s = Settings::default();
		match s.set_count(0) {
			Err(MarkovError::InvalidSetting { name, message }) => {
				assert_eq!(name, "count");
				assert!(message.contains("9999"));
			}
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn seed_policy_parse() {
		assert_eq!("clock".parse::<SeedPolicy>().unwrap(), SeedPolicy::Clock);
		assert_eq!("CLOCK".parse::<SeedPolicy>().unwrap(), SeedPolicy::Clock);
		assert_eq!(" 42 ".parse::<SeedPolicy>().unwrap(), SeedPolicy::Fixed(42));
		assert!("-1".parse::<SeedPolicy>().is_err());
		assert!("soon".parse::<SeedPolicy>().is_err());
	}

	#[test]
	fn fixed_policy_is_reproducible() {
		let mut a = SeedPolicy::Fixed(11).random();
		let mut b = SeedPolicy::Fixed(11).random();
		assert_eq!(a.seed_value(), 11);
		for _ in 0..10 {
			assert_eq!(a.next_int(100).unwrap(), b.next_int(100).unwrap());
		}
	}

	#[test]
	fn seed_policy_display_round_trips() {
		for policy in [SeedPolicy::Clock, SeedPolicy::Fixed(7)] {
			assert_eq!(policy.to_string().parse::<SeedPolicy>().unwrap(), policy);
		}
	}
}
