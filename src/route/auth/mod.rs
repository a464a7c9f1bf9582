use std::sync::Arc;

use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use tower_governor::GovernorLayer;

use crate::{error, ratelimit, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid username or password")]
	InvalidUsernameOrPassword,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
	#[error("no account with that email address exists")]
	UnknownEmail,
	#[error("password reset token is invalid or has expired")]
	InvalidResetToken,
	#[error("password reset expiry is out of range")]
	ResetExpiryOutOfRange,
}

pub type RouteError = error::RouteError<Error>;

/// Credential routes are limited by `limit` when one is given.
pub fn routes(limit: Option<Arc<ratelimit::Config>>) -> ApiRouter<AppState> {
	use route::*;

	let sensitive = ApiRouter::new()
		.api_route("/login", post_with(login, login_docs))
		.api_route("/register", post_with(register, register_docs))
		.api_route("/forgot", post_with(forgot, forgot_docs))
		.api_route(
			"/reset/:token",
			get_with(check_reset, check_reset_docs).post_with(reset, reset_docs),
		);

	let sensitive = match limit {
		Some(config) => sensitive.layer(GovernorLayer { config }),
		None => sensitive,
	};

	ApiRouter::new()
		.merge(sensitive)
		.api_route("/logout", get_with(logout, logout_docs))
		.api_route("/me", get_with(get_me, get_me_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidUsernameOrPassword | Self::NoSessionCookie | Self::InvalidSessionCookie => {
				StatusCode::UNAUTHORIZED
			}
			Self::Argon(..) | Self::ResetExpiryOutOfRange => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
			Self::UnknownEmail => StatusCode::NOT_FOUND,
			Self::InvalidResetToken => StatusCode::BAD_REQUEST,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		vec![error::Message::new(self.to_string())]
	}
}

#[cfg(test)]
mod test {
	use std::future::IntoFuture;

	use crate::test::*;

	#[sqlx::test]
	async fn test_signup_flow(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "john@smith.com",
				"username": "johnny",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), 200);

		assert_eq!(response.json::<serde_json::Value>()["username"], "johnny");

		let response = app.get("/auth/logout").await;

		assert_eq!(response.status_code(), 204);

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_duplicate_registration(pool: Database) {
		let app = app(pool);
		let body = json!({
			"email": "john@smith.com",
			"username": "johnny",
			"password": "hunter2hunter",
		});

		app.post("/auth/register").json(&body).await;

		let response = app.post("/auth/register").json(&body).await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_password_reset_flow(pool: Database) {
		let (app, mailer) = app_with_mailer(pool);

		register(&app, "john@smith.com", "johnny").await;
		app.get("/auth/logout").await;

		let response = app
			.post("/auth/forgot")
			.json(&json!({ "email": "nobody@smith.com" }))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = app
			.post("/auth/forgot")
			.json(&json!({ "email": "john@smith.com" }))
			.await;

		assert_eq!(response.status_code(), 204);

		let link = {
			let sent = mailer.sent.lock().unwrap();
			let body = &sent.last().unwrap().body;

			body.lines()
				.find(|line| line.contains("/auth/reset/"))
				.unwrap()
				.trim()
				.to_string()
		};
		let token = link.rsplit('/').next().unwrap().to_string();

		let response = app.get(&format!("/auth/reset/{token}")).await;

		assert_eq!(response.status_code(), 204);

		let response = app
			.post(&format!("/auth/reset/{token}"))
			.json(&json!({ "password": "newpassword1", "confirm": "different1" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.post(&format!("/auth/reset/{token}"))
			.json(&json!({ "password": "newpassword1", "confirm": "newpassword1" }))
			.await;

		assert_eq!(response.status_code(), 200);

		// The token is single use.
		let response = app.get(&format!("/auth/reset/{token}")).await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.post("/auth/login")
			.json(&json!({ "email": "john@smith.com", "password": "newpassword1" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(mailer.sent.lock().unwrap().len(), 2);
	}

	#[sqlx::test]
	async fn test_reset_token_is_consumed_once(pool: Database) {
		let (app, mailer) = app_with_mailer(pool);

		register(&app, "john@smith.com", "johnny").await;

		app.post("/auth/forgot")
			.json(&json!({ "email": "john@smith.com" }))
			.await;

		let token = {
			let sent = mailer.sent.lock().unwrap();

			sent.last()
				.unwrap()
				.body
				.lines()
				.find_map(|line| line.trim().rsplit_once("/auth/reset/"))
				.unwrap()
				.1
				.to_string()
		};

		let path = format!("/auth/reset/{token}");
		let (first, second) = tokio::join!(
			app.post(&path)
				.json(&json!({ "password": "firstpassword", "confirm": "firstpassword" }))
				.into_future(),
			app.post(&path)
				.json(&json!({ "password": "secondpassword", "confirm": "secondpassword" }))
				.into_future(),
		);

		let mut statuses = [first.status_code().as_u16(), second.status_code().as_u16()];
		statuses.sort_unstable();

		assert_eq!(statuses, [200, 400]);
	}
}
