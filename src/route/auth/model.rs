use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username.chars().any(|c| !c.is_alphanumeric()) {
		return Err(ValidationError::new("username must be alphanumeric"));
	}

	Ok(())
}

/// A single user.
#[model(no_create)]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user's primary email address, used for logging in and password resets.
	#[serde(skip_serializing)]
	#[validate(email)]
	pub email: String,
	/// The hashed password.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// The username that is displayed to the public.
	#[validate(length(min = 5, max = 16), custom(function = "validate_username"))]
	pub username: String,
	#[validate(length(max = 64))]
	pub firstname: Option<String>,
	#[validate(length(max = 64))]
	pub lastname: Option<String>,
	/// A link to the user's avatar image.
	#[validate(url)]
	pub avatar_url: Option<String>,
	#[serde(skip)]
	pub reset_token: Option<String>,
	#[serde(skip)]
	pub reset_expires_at: Option<chrono::DateTime<chrono::Utc>>,
	/// The creation time of the user.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Validate, JsonSchema, sqlx::FromRow)]
pub struct Session {
	/// The session id.
	#[serde(skip_deserializing, rename = "session_id")]
	pub id: Uuid,
	/// The user that owns the session.
	#[serde(skip)]
	#[allow(dead_code)]
	pub user_id: Uuid,
	/// The creation time of the session.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	/// The username that is displayed to the public.
	#[validate(length(min = 5, max = 16), custom(function = "validate_username"))]
	pub username: String,
	#[validate(length(max = 64))]
	pub firstname: Option<String>,
	#[validate(length(max = 64))]
	pub lastname: Option<String>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ForgotInput {
	/// The email address of the account to recover.
	#[validate(email)]
	pub email: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ResetInput {
	/// The new password.
	#[validate(length(min = 8, max = 128), must_match(other = "confirm"))]
	pub password: String,
	/// The new password, repeated.
	pub confirm: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct TokenInput {
	/// The password reset token sent by email.
	pub token: String,
}
