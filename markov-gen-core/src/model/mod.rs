//! Top-level module for the Markov chain.
//!
//! - Token windows and the boundary sentinel (`Window`)
//! - Successor lists (`Successors`)
//! - Chain construction and the frozen model (`ChainBuilder`, `ChainModel`)
//! - Random walk generation
//! - Random sources (`RandomSource`, `Random`)
//! - Run settings (`Settings`, `SeedPolicy`)

/// Builder (ingestion) and frozen model (lookup, dump).
///
/// Handles sentinel padding, per-document window restarts and merging.
pub mod chain;

/// Random walk over a frozen model.
///
/// Adds `walk` and `generate` to `ChainModel`.
mod generator;

/// Word or character tokenization and output joining.
pub mod granularity;

/// Seedable bounded-integer source used for every draw.
pub mod random;

/// Validated order, count, granularity and seed policy.
pub mod settings;

/// Observed successors of one window.
pub mod successors;

/// Fixed-length token window and the `NONWORD` sentinel.
pub mod window;
