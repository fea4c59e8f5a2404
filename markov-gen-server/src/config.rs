//! Server configuration read from environment variables.
//!
//! Every key is `MARKOV_GEN_` + suffix. Unset keys fall back to
//! `ServerConfig::default`; a set key that fails to parse is an error.

use std::path::PathBuf;

use thiserror::Error;

const ENV_PREFIX: &str = "MARKOV_GEN_";

pub(crate) const ENV_HOST: &str = "HOST";
pub(crate) const ENV_PORT: &str = "PORT";
pub(crate) const ENV_DATA_DIR: &str = "DATA_DIR";
pub(crate) const ENV_WORKERS: &str = "WORKERS";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_DIR: &str = "./data";

/// Errors produced while reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The variable is set but not valid Unicode.
	#[error("config env {key}: {message}")]
	EnvVar { key: String, message: String },

	/// The variable is set but does not parse into the expected type.
	#[error("config parse {key}={value:?}: {message}")]
	Parse { key: String, value: String, message: String },

	/// The parsed values are inconsistent.
	#[error("config validation: {0}")]
	Validation(String),
}

/// Listening address, document directory and worker count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	/// Directory holding the `.txt` documents.
	pub data_dir: PathBuf,
	/// Number of HTTP worker threads.
	pub workers: usize,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_owned(),
			port: DEFAULT_PORT,
			data_dir: PathBuf::from(DEFAULT_DATA_DIR),
			workers: num_cpus::get(),
		}
	}
}

impl ServerConfig {
	/// Builds the configuration from the environment.
	///
	/// # Errors
	/// Returns a `ConfigError` if a set variable is invalid or `workers` is 0.
	pub fn from_env() -> Result<Self, ConfigError> {
		let default = Self::default();

		let host = env_string(&env_key(ENV_HOST))?.unwrap_or(default.host);
		let port = env_parsed::<u16>(&env_key(ENV_PORT))?.unwrap_or(default.port);
		let data_dir = env_string(&env_key(ENV_DATA_DIR))?
			.map(|dir| markov_gen_core::io::normalize_folder(&dir))
			.unwrap_or(default.data_dir);
		let workers = env_parsed::<usize>(&env_key(ENV_WORKERS))?.unwrap_or(default.workers);

		let config = Self { host, port, data_dir, workers };
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.workers == 0 {
			return Err(ConfigError::Validation("workers must be greater than 0".to_owned()));
		}
		Ok(())
	}
}

/// Full variable name for a suffix (e.g. `PORT` → `MARKOV_GEN_PORT`).
pub(crate) fn env_key(suffix: &str) -> String {
	format!("{ENV_PREFIX}{suffix}")
}

fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
	match std::env::var(key) {
		Ok(s) => Ok(Some(s)),
		Err(std::env::VarError::NotPresent) => Ok(None),
		Err(e) => Err(ConfigError::EnvVar { key: key.to_owned(), message: e.to_string() }),
	}
}

fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
	T: std::str::FromStr,
	T::Err: std::fmt::Display,
{
	let Some(value) = env_string(key)? else {
		return Ok(None);
	};
	match value.trim().parse() {
		Ok(t) => Ok(Some(t)),
		Err(e) => Err(ConfigError::Parse { key: key.to_owned(), value, message: e.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Mutex, OnceLock};

	/// Env tests must not run in parallel.
	static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

	fn lock() -> std::sync::MutexGuard<'static, ()> {
		ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|e| e.into_inner())
	}

	fn clear() {
		for suffix in [ENV_HOST, ENV_PORT, ENV_DATA_DIR, ENV_WORKERS] {
			// SAFETY: env access is serialized by ENV_LOCK
			unsafe { std::env::remove_var(env_key(suffix)) };
		}
	}

	#[test]
	fn defaults_when_unset() {
		let _g = lock();
		clear();
		let config = ServerConfig::from_env().unwrap();
		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.port, 5000);
		assert_eq!(config.data_dir, PathBuf::from("./data"));
		assert!(config.workers >= 1);
	}

	#[test]
	fn env_overrides() {
		let _g = lock();
		clear();
		unsafe {
			std::env::set_var(env_key(ENV_PORT), "8080");
			std::env::set_var(env_key(ENV_DATA_DIR), "corpus");
			std::env::set_var(env_key(ENV_WORKERS), "2");
		}
		let config = ServerConfig::from_env().unwrap();
		clear();
		assert_eq!(config.port, 8080);
		assert_eq!(config.data_dir, PathBuf::from("corpus"));
		assert_eq!(config.workers, 2);
	}

	#[test]
	fn invalid_port_is_a_parse_error() {
		let _g = lock();
		clear();
		unsafe { std::env::set_var(env_key(ENV_PORT), "http") };
		let result = ServerConfig::from_env();
		clear();
		match result {
			Err(ConfigError::Parse { key, value, .. }) => {
				assert_eq!(key, "MARKOV_GEN_PORT");
				assert_eq!(value, "http");
			}
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn zero_workers_is_rejected() {
		let _g = lock();
		clear();
		unsafe { std::env::set_var(env_key(ENV_WORKERS), "0") };
		let result = ServerConfig::from_env();
		clear();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}
}
