use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

use crate::guard;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message presented to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A machine-readable error code, such as `unknown_campground`.
	pub content: Cow<'a, str>,
	/// The input field the error relates to, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional context for the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub success: bool,
	pub errors: Vec<Message<'a>>,
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;
}

/// Application-wide errors that any route can produce.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("guard error: {0}")]
	Guard(#[from] guard::Error),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("rate limit error: {0}")]
	RateLimit(#[from] GovernorError),
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) | Self::Path(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::Guard(error) => error.status(),
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::RateLimit(GovernorError::TooManyRequests { .. }) => StatusCode::TOO_MANY_REQUESTS,
			Self::RateLimit(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| Message {
						content: error.code.clone(),
						field: Some(Cow::Owned(field.to_string())),
						details: (!error.params.is_empty()).then(|| {
							Cow::Owned(
								error
									.params
									.iter()
									.map(|(key, value)| (key.to_string(), value.clone()))
									.collect(),
							)
						}),
					})
				})
				.collect(),
			Self::Json(error) => vec![Message::new(error.body_text())],
			Self::Query(error) => vec![Message::new(error.body_text())],
			Self::Path(error) => vec![Message::new(error.body_text())],
			Self::Guard(error) => error.errors(),
			Self::RateLimit(GovernorError::TooManyRequests { wait_time, .. }) => {
				vec![Message {
					content: "too_many_requests".into(),
					field: None,
					details: Some(Cow::Owned({
						let mut map = Map::new();
						map.insert("wait_time".into(), (*wait_time).into());
						map
					})),
				}]
			}
			Self::Database(..) | Self::RateLimit(..) => Vec::new(),
		}
	}
}

fn respond<E>(error: &E, status: StatusCode, errors: Vec<Message<'_>>) -> Response<Body>
where
	E: std::error::Error,
{
	if status.is_server_error() {
		tracing::error!(%status, "{error}");
	} else {
		tracing::debug!(%status, "{error}");
	}

	(
		status,
		Json(ErrorResponse {
			success: false,
			errors,
		}),
	)
		.into_response()
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		respond(&self, self.status(), self.errors())
	}
}

impl OperationOutput for AppError {
	type Inner = Self;
}

/// The error type returned by route handlers.
///
/// Either an application-wide [`AppError`] or a route-specific error `T`.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T> {
	#[error(transparent)]
	App(AppError),
	#[error(transparent)]
	Route(T),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T> From<sqlx::Error> for RouteError<T> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(error.into())
	}
}

impl<T> From<guard::Error> for RouteError<T> {
	fn from(error: guard::Error) -> Self {
		Self::App(error.into())
	}
}

impl<T> From<validator::ValidationErrors> for RouteError<T> {
	fn from(error: validator::ValidationErrors) -> Self {
		Self::App(error.into())
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => respond(&error, error.status(), error.errors()),
		}
	}
}

impl<T> OperationOutput for RouteError<T> {
	type Inner = Self;
}
