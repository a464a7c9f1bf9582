use std::{fmt::Display, net::IpAddr, str::FromStr};

use tracing::{info, warn};

/// The longest a password reset link may stay valid: 30 days.
pub const MAX_RESET_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// An error produced while reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("invalid value for {key}: {message}")]
	Invalid { key: &'static str, message: String },
}

/// Which review mutations end users may perform on their own reviews.
///
/// Creation is always allowed. Both toggles are off unless enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReviewPolicy {
	pub allow_update: bool,
	pub allow_delete: bool,
}

/// Process-wide configuration, read once at start-up and shared through
/// the application state.
#[derive(Clone, Debug)]
pub struct Config {
	pub database_url: String,
	pub host: IpAddr,
	pub port: u16,
	/// Base URL used when building links sent by email.
	pub public_url: String,
	pub mail_from: String,
	pub reset_token_ttl: chrono::Duration,
	pub reviews: ReviewPolicy,
	pub rate_limit: bool,
	pub telemetry: bool,
}

impl Config {
	/// Reads the configuration from the process environment (after loading `.env`).
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads the configuration through `lookup`, which returns the raw value of a key.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
	where
		F: Fn(&str) -> Option<String>,
	{
		let reset_token_ttl: i64 = parse_or(&lookup, "RESET_TOKEN_TTL_SECS", 3600)?;

		if !(1..=MAX_RESET_TOKEN_TTL_SECS).contains(&reset_token_ttl) {
			return Err(Error::Invalid {
				key: "RESET_TOKEN_TTL_SECS",
				message: format!("must be between 1 and {MAX_RESET_TOKEN_TTL_SECS}"),
			});
		}

		let reset_token_ttl =
			chrono::Duration::try_seconds(reset_token_ttl).ok_or_else(|| Error::Invalid {
				key: "RESET_TOKEN_TTL_SECS",
				message: "out of range".into(),
			})?;

		Ok(Self {
			database_url: lookup("DATABASE_URL").ok_or(Error::Missing("DATABASE_URL"))?,
			host: parse_or(&lookup, "HOST", IpAddr::from([127, 0, 0, 1]))?,
			port: parse_or(&lookup, "PORT", 3000)?,
			public_url: lookup("PUBLIC_URL")
				.map(|url| url.trim_end_matches('/').to_string())
				.unwrap_or_else(|| "http://localhost:3000".into()),
			mail_from: lookup("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".into()),
			reset_token_ttl,
			reviews: ReviewPolicy {
				allow_update: flag(&lookup, "ALLOW_REVIEW_UPDATE", false)?,
				allow_delete: flag(&lookup, "ALLOW_REVIEW_DELETE", false)?,
			},
			rate_limit: flag(&lookup, "RATE_LIMIT", true)?,
			telemetry: flag(&lookup, "OTEL", false)?,
		})
	}
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, Error>
where
	F: Fn(&str) -> Option<String>,
	T: FromStr + Display,
	T::Err: Display,
{
	let Some(value) = lookup(key) else {
		info!("{key} not set, using default: {default}");
		return Ok(default);
	};

	value.trim().parse().map_err(|e: T::Err| {
		warn!("invalid {key} value: {e}");

		Error::Invalid {
			key,
			message: e.to_string(),
		}
	})
}

fn flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, Error>
where
	F: Fn(&str) -> Option<String>,
{
	let Some(value) = lookup(key) else {
		return Ok(default);
	};

	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		other => Err(Error::Invalid {
			key,
			message: format!("expected a boolean, got {other:?}"),
		}),
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn load(pairs: &[(&str, &str)]) -> Result<Config, Error> {
		let env = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|key| env.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = load(&[("DATABASE_URL", "postgres://localhost/camp")]).unwrap();

		assert_eq!(config.port, 3000);
		assert_eq!(config.host.to_string(), "127.0.0.1");
		assert_eq!(config.reset_token_ttl, chrono::Duration::hours(1));
		assert_eq!(config.reviews, ReviewPolicy::default());
		assert!(config.rate_limit);
		assert!(!config.telemetry);
	}

	#[test]
	fn test_missing_database_url() {
		assert!(matches!(load(&[]), Err(Error::Missing("DATABASE_URL"))));
	}

	#[test]
	fn test_review_policy_toggles() {
		let config = load(&[
			("DATABASE_URL", "postgres://localhost/camp"),
			("ALLOW_REVIEW_UPDATE", "true"),
			("ALLOW_REVIEW_DELETE", "0"),
		])
		.unwrap();

		assert!(config.reviews.allow_update);
		assert!(!config.reviews.allow_delete);
	}

	#[test]
	fn test_invalid_values() {
		let port = load(&[("DATABASE_URL", "x"), ("PORT", "eighty")]);
		assert!(matches!(port, Err(Error::Invalid { key: "PORT", .. })));

		let flag = load(&[("DATABASE_URL", "x"), ("RATE_LIMIT", "maybe")]);
		assert!(matches!(flag, Err(Error::Invalid { key: "RATE_LIMIT", .. })));

		for value in ["0", "-5", "9000000000000", "9223372036854775807"] {
			let ttl = load(&[("DATABASE_URL", "x"), ("RESET_TOKEN_TTL_SECS", value)]);
			assert!(
				matches!(
					ttl,
					Err(Error::Invalid {
						key: "RESET_TOKEN_TTL_SECS",
						..
					})
				),
				"{value} should be rejected"
			);
		}

		let longest = load(&[
			("DATABASE_URL", "x"),
			("RESET_TOKEN_TTL_SECS", MAX_RESET_TOKEN_TTL_SECS.to_string().as_str()),
		])
		.unwrap();

		assert!(chrono::Utc::now()
			.checked_add_signed(longest.reset_token_ttl)
			.is_some());
	}

	#[test]
	fn test_public_url_trailing_slash() {
		let config = load(&[
			("DATABASE_URL", "x"),
			("PUBLIC_URL", "https://camp.example/"),
		])
		.unwrap();

		assert_eq!(config.public_url, "https://camp.example");
	}
}
