//! Markov chain text generation library.
//!
//! This crate provides a fixed-order Markov chain over word or character
//! tokens, including:
//! - Chain construction from one or more documents (`ChainBuilder`)
//! - A frozen, read-only chain for generation (`ChainModel`)
//! - Random walk generation with a pluggable, seedable random source
//! - Validated run settings and document I/O helpers
//!
//! Building and generating are two distinct types: a `ChainBuilder` can
//! only ingest, a `ChainModel` can only be read.

/// Chain model, generation, randomness and settings.
pub mod model;

/// Document I/O utilities (file loading, listing, naming).
pub mod io;

/// Error type shared by the whole crate.
pub mod error;

pub use error::{MarkovError, Result};
pub use model::chain::{ChainBuilder, ChainModel};
pub use model::granularity::Granularity;
pub use model::random::{Random, RandomSource};
pub use model::settings::{SeedPolicy, Settings};
pub use model::window::{Token, Window, NONWORD};
