use aide::axum::IntoApiResponse;
use argon2::Argon2;
use chrono::{DateTime, Utc};
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::IntoResponse,
};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Path, Session},
	mail,
	openapi::tag,
	session, AppState, Database,
};

use super::{model, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and creating a new password,
/// the scope of this function can remain in here with no issues.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Log in
/// Logs in to an account, returning an associated session cookie.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<model::Session>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(auth): Json<model::LoginInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE email = $1"#)
		.bind(&auth.email)
		.fetch_optional(&state.database)
		.await?;

	let Some(user) = user else {
		return Err(Error::InvalidUsernameOrPassword.into());
	};

	let hashed = hash_password(&state.hasher, &auth.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		tracing::info!(user_id = %user.id, "rejected login");
		return Err(Error::InvalidUsernameOrPassword.into());
	}

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO session (user_id) VALUES ($1) RETURNING *",
	)
	.bind(user.id)
	.fetch_one(&state.database)
	.await?;

	let cookie = session::create_cookie(session.id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)))
}

/// Log out
/// Logs out of the authenticated account, invalidating its session.
#[route(tag = tag::AUTH, response(status = 204, description = "Logged out successfully."))]
pub async fn logout(
	State(database): State<Database>,
	session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	sqlx::query("DELETE FROM session WHERE id = $1")
		.bind(session.id)
		.execute(&database)
		.await?;

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		StatusCode::NO_CONTENT,
	)
		.into_response())
}

/// Register account
/// Registers a new account, returning an associated session cookie.
#[route(tag = tag::AUTH, response(status = 200, description = "Registered successfully.", shape = "Json<model::Session>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(auth): Json<model::RegisterInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user_id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &auth.password, &user_id).map_err(Error::Argon)?;

	let mut tx = state.database.begin().await?;

	sqlx::query(
		r#"
			INSERT INTO "user" (id, email, username, password, firstname, lastname)
			VALUES ($1, $2, $3, $4, $5, $6)
		"#,
	)
	.bind(user_id)
	.bind(&auth.email)
	.bind(&auth.username)
	.bind(&hashed[..])
	.bind(&auth.firstname)
	.bind(&auth.lastname)
	.execute(&mut *tx)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("user_email_key") => Error::EmailTaken.into(),
			Some("user_username_key") => Error::UsernameTaken.into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?;

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO session (user_id) VALUES ($1) RETURNING *",
	)
	.bind(user_id)
	.fetch_one(&mut *tx)
	.await?;

	tx.commit().await?;

	tracing::info!(%user_id, username = %auth.username, "registered user");

	let cookie = session::create_cookie(session.id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)))
}

/// Get user
/// Returns the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}

/// The time at which a reset token issued at `now` stops being valid.
fn reset_expiry(now: DateTime<Utc>, ttl: chrono::Duration) -> Result<DateTime<Utc>, Error> {
	now.checked_add_signed(ttl).ok_or(Error::ResetExpiryOutOfRange)
}

/// Request password reset
/// Sends a single-use password reset link to the account's email address.
#[route(tag = tag::AUTH, response(status = 204, description = "Reset link sent."))]
pub async fn forgot(
	State(state): State<AppState>,
	Json(input): Json<model::ForgotInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let token = Uuid::new_v4().simple().to_string();
	let expires_at = reset_expiry(Utc::now(), state.config.reset_token_ttl)?;

	let user = sqlx::query_as::<_, model::User>(
		r#"
			UPDATE "user"
			SET reset_token = $1, reset_expires_at = $2
			WHERE email = $3
			RETURNING *
		"#,
	)
	.bind(&token)
	.bind(expires_at)
	.bind(&input.email)
	.fetch_optional(&state.database)
	.await?;

	let user = user.ok_or(Error::UnknownEmail)?;
	let link = format!("{}/auth/reset/{token}", state.config.public_url);

	state
		.mailer
		.send(mail::reset_requested(
			&state.config.mail_from,
			&user.email,
			&link,
		))
		.await;

	tracing::info!(user_id = %user.id, "password reset requested");

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Check password reset token
/// Succeeds if the token exists and has not expired.
#[route(tag = tag::AUTH, response(status = 204, description = "The token is valid."))]
pub async fn check_reset(
	State(database): State<Database>,
	Path(input): Path<model::TokenInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	find_by_reset_token(&database, &input.token).await?;

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Reset password
/// Sets a new password using a reset token, then logs in to the account.
#[route(tag = tag::AUTH, response(status = 200, description = "Password changed.", shape = "Json<model::Session>"))]
pub async fn reset(
	State(state): State<AppState>,
	Path(token): Path<model::TokenInput>,
	Json(input): Json<model::ResetInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user = find_by_reset_token(&state.database, &token.token).await?;
	let hashed = hash_password(&state.hasher, &input.password, &user.id).map_err(Error::Argon)?;

	let mut tx = state.database.begin().await?;

	// The token is consumed by this update, so only one of two concurrent resets succeeds.
	let updated = sqlx::query(
		r#"
			UPDATE "user"
			SET password = $1, reset_token = NULL, reset_expires_at = NULL
			WHERE id = $2 AND reset_token = $3 AND reset_expires_at > now()
		"#,
	)
	.bind(&hashed[..])
	.bind(user.id)
	.bind(&token.token)
	.execute(&mut *tx)
	.await?;

	if updated.rows_affected() == 0 {
		return Err(Error::InvalidResetToken.into());
	}

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO session (user_id) VALUES ($1) RETURNING *",
	)
	.bind(user.id)
	.fetch_one(&mut *tx)
	.await?;

	tx.commit().await?;

	state
		.mailer
		.send(mail::password_changed(
			&state.config.mail_from,
			&user.email,
			&user.username,
		))
		.await;

	tracing::info!(user_id = %user.id, "password reset");

	let cookie = session::create_cookie(session.id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)))
}

async fn find_by_reset_token(database: &Database, token: &str) -> Result<model::User, RouteError> {
	let user = sqlx::query_as::<_, model::User>(
		r#"
			SELECT * FROM "user"
			WHERE reset_token = $1 AND reset_expires_at > now()
		"#,
	)
	.bind(token)
	.fetch_optional(database)
	.await?;

	Ok(user.ok_or(Error::InvalidResetToken)?)
}
