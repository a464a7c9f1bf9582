#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod guard;
mod mail;
mod model;
mod openapi;
mod ratelimit;
mod rating;
mod route;
mod session;
mod store;
#[cfg(test)]
mod test;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::openapi::OpenApi;
use argon2::Argon2;
use axum::{extract::Request, Extension, Router, ServiceExt};
use tower::Layer;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{
	config::Config,
	mail::{LogMailer, Mailer},
	ratelimit::Limits,
};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database connection pool, a hash configuration (if it's expensive to create),
/// or a mail client.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub config: Arc<Config>,
	pub mailer: Arc<dyn Mailer>,
}

/// Builds the application router, along with its `OpenAPI` document.
pub fn app(state: State, limits: Option<&Limits>) -> Router {
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();
	let router = route::routes(limits).finish_api_with(&mut api, openapi::docs);

	let router = match limits {
		Some(limits) => router.layer(GovernorLayer {
			config: limits.default.clone(),
		}),
		None => router,
	};

	router
		.layer(Extension(Arc::new(api)))
		.layer(CompressionLayer::new())
		.layer(CorsLayer::very_permissive())
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(
			TraceLayer::new_for_http().make_span_with(|request: &Request| {
				let request_id = request
					.headers()
					.get("x-request-id")
					.and_then(|value| value.to_str().ok())
					.unwrap_or_default();

				tracing::info_span!(
					"request",
					method = %request.method(),
					uri = %request.uri(),
					request_id,
				)
			}),
		)
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let config = Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(&config)?;

	let database = Database::connect(&config.database_url).await?;

	sqlx::migrate!().run(&database).await?;

	let limits = config.rate_limit.then(Limits::new);

	if let Some(limits) = &limits {
		limits.start_cleanup();
	}

	let address = SocketAddr::from((config.host, config.port));
	let state = State {
		database,
		hasher: Argon2::default(),
		config: Arc::new(config),
		mailer: Arc::new(LogMailer),
	};

	let app = NormalizePathLayer::trim_trailing_slash().layer(app(state, limits.as_ref()));
	let listener = tokio::net::TcpListener::bind(address).await?;

	tracing::info!(%address, "listening");

	axum::serve(
		listener,
		ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
	)
	.await?;

	Ok(())
}
