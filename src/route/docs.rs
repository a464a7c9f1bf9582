//! The interactive API reference and the document it renders.

use std::sync::Arc;

use aide::{
	axum::{routing::get_with, ApiRouter, IntoApiResponse},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, routing::get, Extension};

use crate::{extract::Json, openapi::SECURITY_SCHEME_SESSION, AppState};

/// Where the generated document is served, relative to the host.
const DOCUMENT_PATH: &str = "/docs/private/api.json";

pub fn routes() -> ApiRouter<AppState> {
	let reference = Scalar::new(DOCUMENT_PATH)
		.with_title("Campground API reference")
		.axum_handler();

	ApiRouter::new()
		.api_route_with(
			"/",
			get_with(reference, |op| {
				op.summary("API reference")
					.description("Browsable reference for every campground, review and account route.")
			}),
			|p| p.security_requirement(SECURITY_SCHEME_SESSION),
		)
		// Kept out of the document it serves.
		.route("/private/api.json", get(document))
}

async fn document(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(&*api).into_response()
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_document_lists_routes(pool: Database) {
		let app = app(pool);

		let response = app.get(super::DOCUMENT_PATH).await;
		response.assert_status_ok();

		let document = response.json::<serde_json::Value>();

		let paths = document["paths"].as_object().unwrap();

		assert!(paths.keys().any(|path| path.starts_with("/campgrounds")));
		assert!(!paths.contains_key("/docs/private/api.json"));

		app.get("/docs").await.assert_status_ok();
	}
}
