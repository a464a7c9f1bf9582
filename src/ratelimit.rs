use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	response::{IntoResponse, Response},
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError,
};

use crate::error::AppError;

pub type Config = GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// The limit applied to every route: bursts of 50, refilling 10 per second.
pub fn default() -> Arc<Config> {
	Arc::new(
		GovernorConfigBuilder::default()
			.per_second(10)
			.burst_size(50)
			.use_headers()
			.error_handler(error_handler)
			.finish()
			.expect("burst size and period are non-zero"),
	)
}

/// The limit applied to credential routes, such as logging in and password resets.
pub fn secure() -> Arc<Config> {
	Arc::new(
		GovernorConfigBuilder::default()
			.per_second(1)
			.burst_size(5)
			.use_headers()
			.error_handler(error_handler)
			.finish()
			.expect("burst size and period are non-zero"),
	)
}

/// The rate limits shared by the whole application.
#[derive(Clone)]
pub struct Limits {
	pub default: Arc<Config>,
	pub secure: Arc<Config>,
}

impl Limits {
	pub fn new() -> Self {
		Self {
			default: default(),
			secure: secure(),
		}
	}

	/// Starts evicting stale state for both limits.
	pub fn start_cleanup(&self) {
		cleanup_old_limits(&[&self.default, &self.secure]);
	}
}

fn error_handler(error: GovernorError) -> Response<Body> {
	AppError::from(error).into_response()
}

/// Periodically evicts stale rate limiting state on a background thread.
fn cleanup_old_limits<T, M>(configs: &[&Arc<GovernorConfig<T, M>>])
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiters = configs
		.iter()
		.map(|config| config.limiter().clone())
		.collect::<Vec<_>>();
	let interval = Duration::from_secs(60);

	std::thread::spawn(move || loop {
		std::thread::sleep(interval);

		for limiter in &limiters {
			tracing::debug!("rate limiting storage size: {}", limiter.len());

			limiter.retain_recent();
		}
	});
}
