use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, route::campground, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown campground {0}")]
	UnknownCampground(Uuid),
	#[error("unknown review {0}")]
	UnknownReview(Uuid),
	#[error("review updates are disabled")]
	UpdateDisabled,
	#[error("review deletion is disabled")]
	DeleteDisabled,
}

pub type RouteError = error::RouteError<Error>;

/// Routes nested under a single campground.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/:id/reviews",
			get_with(get_reviews, get_reviews_docs).post_with(create_review, create_review_docs),
		)
		.api_route(
			"/:id/reviews/:review_id",
			put_with(update_review, update_review_docs)
				.delete_with(delete_review, delete_review_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownCampground(..) | Self::UnknownReview(..) => StatusCode::NOT_FOUND,
			Self::UpdateDisabled | Self::DeleteDisabled => StatusCode::FORBIDDEN,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownCampground(id) => vec![campground::unknown_campground(*id)],
			Self::UnknownReview(id) => vec![error::Message {
				content: "unknown_review".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("review".into(), json!(id));
					map
				})),
			}],
			Self::UpdateDisabled => vec![error::Message::new("review_update_disabled")],
			Self::DeleteDisabled => vec![error::Message::new("review_delete_disabled")],
		}
	}
}

#[cfg(test)]
mod test {
	use crate::{config::ReviewPolicy, test::*};

	async fn rating(app: &TestServer, campground: &str) -> f64 {
		app.get(&format!("/campgrounds/{campground}"))
			.await
			.json::<serde_json::Value>()["rating"]
			.as_f64()
			.unwrap()
	}

	async fn review(app: &TestServer, campground: &str, rating: i64) -> String {
		let response = app
			.post(&format!("/campgrounds/{campground}/reviews"))
			.json(&json!({ "rating": rating, "text": "Nice spot." }))
			.await;

		assert_eq!(response.status_code(), 200);

		response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.to_string()
	}

	#[sqlx::test]
	async fn test_rating_follows_reviews(pool: Database) {
		let app = app(pool);
		register(&app, "john@smith.com", "johnny").await;

		let campground = create_campground(&app).await;

		assert_eq!(rating(&app, &campground).await, 0.0);

		for stars in [4, 5, 3] {
			review(&app, &campground, stars).await;
		}

		assert!((rating(&app, &campground).await - 4.0).abs() < 1e-9);

		let response = app
			.post(&format!("/campgrounds/{campground}/reviews"))
			.json(&json!({ "rating": 6 }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert!((rating(&app, &campground).await - 4.0).abs() < 1e-9);

		let page = app
			.get(&format!("/campgrounds/{campground}/reviews"))
			.await
			.json::<serde_json::Value>();

		assert_eq!(page["items"].as_array().unwrap().len(), 3);
		assert_eq!(page["total_pages"], 1);
	}

	#[sqlx::test]
	async fn test_review_requires_session(pool: Database) {
		let app = app(pool);
		register(&app, "john@smith.com", "johnny").await;

		let campground = create_campground(&app).await;

		app.get("/auth/logout").await;

		let response = app
			.post(&format!("/campgrounds/{campground}/reviews"))
			.json(&json!({ "rating": 5 }))
			.await;

		assert_eq!(response.status_code(), 401);

		let response = app
			.post(&format!("/campgrounds/{}/reviews", uuid::Uuid::new_v4()))
			.json(&json!({ "rating": 5 }))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_review_mutations_disabled_by_default(pool: Database) {
		let app = app(pool);
		register(&app, "john@smith.com", "johnny").await;

		let campground = create_campground(&app).await;
		let id = review(&app, &campground, 2).await;

		let response = app
			.put(&format!("/campgrounds/{campground}/reviews/{id}"))
			.json(&json!({ "rating": 5 }))
			.await;

		assert_eq!(response.status_code(), 403);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["content"],
			"review_update_disabled"
		);

		let response = app
			.delete(&format!("/campgrounds/{campground}/reviews/{id}"))
			.await;

		assert_eq!(response.status_code(), 403);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["content"],
			"review_delete_disabled"
		);

		assert!((rating(&app, &campground).await - 2.0).abs() < 1e-9);
	}

	#[sqlx::test]
	async fn test_review_mutations_when_enabled(pool: Database) {
		let app = app_with_reviews(
			pool,
			ReviewPolicy {
				allow_update: true,
				allow_delete: true,
			},
		);
		register(&app, "john@smith.com", "johnny").await;

		let campground = create_campground(&app).await;
		let first = review(&app, &campground, 2).await;
		review(&app, &campground, 4).await;

		let response = app
			.put(&format!("/campgrounds/{campground}/reviews/{first}"))
			.json(&json!({ "rating": 5 }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert!((rating(&app, &campground).await - 4.5).abs() < 1e-9);

		register(&app, "jane@smith.com", "janedoe").await;

		let response = app
			.delete(&format!("/campgrounds/{campground}/reviews/{first}"))
			.await;

		assert_eq!(response.status_code(), 403);

		app.post("/auth/login")
			.json(&json!({ "email": "john@smith.com", "password": "hunter2hunter" }))
			.await;

		let response = app
			.delete(&format!("/campgrounds/{campground}/reviews/{first}"))
			.await;

		assert_eq!(response.status_code(), 204);
		assert!((rating(&app, &campground).await - 4.0).abs() < 1e-9);
	}
}
