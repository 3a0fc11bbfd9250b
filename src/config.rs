use std::{env, str::FromStr, time::Duration};

use sqlx::sqlite::SqliteConnectOptions;

/// Errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{key} has an invalid value: {value:?}")]
	Invalid { key: &'static str, value: String },
}

/// Runtime configuration, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub host: String,
	pub port: u16,
	/// How long a rendered index page is served from the cache.
	pub index_cache_ttl: Duration,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database_url: "sqlite://yatube.db".into(),
			host: "127.0.0.1".into(),
			port: 3000,
			index_cache_ttl: Duration::from_secs(20),
		}
	}
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		let default = Self::default();

		Ok(Self {
			database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),
			host: env::var("HOST").unwrap_or(default.host),
			port: parse("PORT")?.unwrap_or(default.port),
			index_cache_ttl: parse("INDEX_CACHE_SECONDS")?
				.map_or(default.index_cache_ttl, Duration::from_secs),
		})
	}

	/// Connection options for [`Config::database_url`]. The database file is
	/// created on first start.
	pub fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
		Ok(SqliteConnectOptions::from_str(&self.database_url)?
			.create_if_missing(true)
			.foreign_keys(true))
	}
}

/// Reads and parses an optional variable. Unset is `None`, unparsable is an error.
fn parse<T: FromStr>(key: &'static str) -> Result<Option<T>, Error> {
	let Ok(value) = env::var(key) else {
		tracing::debug!("{key} not set, using default");
		return Ok(None);
	};

	value
		.parse()
		.map(Some)
		.map_err(|_| Error::Invalid { key, value })
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_default_config() {
		let config = Config::default();

		assert_eq!(config.port, 3000);
		assert_eq!(config.index_cache_ttl, Duration::from_secs(20));
	}

	#[test]
	fn test_connect_options() {
		let config = Config {
			database_url: "sqlite::memory:".into(),
			..Config::default()
		};

		assert!(config.connect_options().is_ok());
	}
}
