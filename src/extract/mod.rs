//! Request extractors that report every rejection as an [`AppError`].

mod session;

pub use session::{MaybeSession, Session};

use aide::OperationIo;
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// Runs the `validator` rules of an already deserialized input.
fn validated<T: Validate>(input: T) -> Result<T, AppError> {
	input.validate()?;
	Ok(input)
}

/// A JSON body that has passed its `validator` rules.
///
/// Also used as the response wrapper, so that handlers document their output
/// schema through the same type.
///
/// ```rust
/// async fn create(Json(input): Json<model::CreateCampgroundInput>) {
///   // input.lat is already within [-90, 90]
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum_jsonschema::Json<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::extract::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: DeserializeOwned + Validate + 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let axum::extract::Json(input) = axum::extract::Json::<T>::from_request(req, state).await?;

		validated(input).map(Self)
	}
}

/// Query string parameters that have passed their `validator` rules, such as
/// page bounds or a search term length.
#[derive(OperationIo)]
#[aide(input_with = "axum::extract::Query<T>", json_schema)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: DeserializeOwned + Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let axum::extract::Query(input) =
			axum::extract::Query::<T>::from_request_parts(parts, state).await?;

		validated(input).map(Self)
	}
}

/// Named path captures, such as `{ id, comment_id }`.
///
/// A capture that is not a valid id is a 400 with the usual error body, rather
/// than axum's plain-text rejection.
#[derive(OperationIo)]
#[aide(input_with = "axum::extract::Path<T>", json_schema)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: DeserializeOwned + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		axum::extract::Path::<T>::from_request_parts(parts, state)
			.await
			.map(|axum::extract::Path(captures)| Self(captures))
			.map_err(AppError::from)
	}
}

#[cfg(test)]
mod test {
	use axum::{http::StatusCode, routing::get, Router};
	use axum_test::TestServer;
	use serde::Deserialize;
	use uuid::Uuid;

	use super::*;

	#[derive(Deserialize, Validate)]
	struct Search {
		#[validate(length(max = 4))]
		q: String,
	}

	#[derive(Deserialize)]
	struct Capture {
		id: Uuid,
	}

	fn server() -> TestServer {
		let router = Router::new()
			.route("/search", get(|Query(search): Query<Search>| async move { search.q }))
			.route(
				"/items/:id",
				get(|Path(capture): Path<Capture>| async move { capture.id.to_string() }),
			);

		TestServer::new(router).unwrap()
	}

	#[tokio::test]
	async fn test_query_is_validated() {
		let server = server();

		let response = server.get("/search").add_query_param("q", "pine").await;
		assert_eq!(response.status_code(), StatusCode::OK);

		let response = server.get("/search").add_query_param("q", "pinewood").await;
		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(response.json::<serde_json::Value>()["errors"][0]["field"], "q");
	}

	#[tokio::test]
	async fn test_path_rejection_uses_error_body() {
		let server = server();
		let id = Uuid::new_v4();

		let response = server.get(&format!("/items/{id}")).await;
		assert_eq!(response.text(), id.to_string());

		let response = server.get("/items/not-an-id").await;
		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(response.json::<serde_json::Value>()["success"], false);
	}
}
