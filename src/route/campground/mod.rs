use std::borrow::Cow;

use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown campground {0}")]
	UnknownCampground(Uuid),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_campgrounds, get_campgrounds_docs)
				.post_with(create_campground, create_campground_docs),
		)
		.api_route(
			"/:id",
			get_with(get_campground, get_campground_docs)
				.put_with(update_campground, update_campground_docs)
				.delete_with(delete_campground, delete_campground_docs),
		)
}

/// The error message for a campground that does not exist.
pub(crate) fn unknown_campground(id: Uuid) -> error::Message<'static> {
	error::Message {
		content: "unknown_campground".into(),
		field: None,
		details: Some(Cow::Owned({
			let mut map = error::Map::new();
			map.insert("campground".into(), json!(id));
			map
		})),
	}
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownCampground(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownCampground(id) => vec![unknown_campground(*id)],
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn campground() -> serde_json::Value {
		json!({
			"name": "Pine Ridge",
			"price": "12.50",
			"description": "Quiet sites under the pines.",
			"location": "Bend, Oregon",
			"lat": 44.05,
			"lng": -121.31,
			"image_url": "https://img.example/pine.jpg",
		})
	}

	#[sqlx::test]
	async fn test_create_requires_session(pool: Database) {
		let app = app(pool);

		let response = app.post("/campgrounds").json(&campground()).await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_campground_lifecycle(pool: Database) {
		let app = app(pool);
		let user_id = register(&app, "john@smith.com", "johnny").await;

		let response = app.post("/campgrounds").json(&campground()).await;

		assert_eq!(response.status_code(), 200);

		let created = response.json::<serde_json::Value>();
		let id = created["id"].as_str().unwrap().to_string();

		assert_eq!(created["author"]["id"], user_id.to_string());
		assert_eq!(created["author"]["username"], "johnny");
		assert_eq!(created["rating"], 0.0);

		let response = app
			.put(&format!("/campgrounds/{id}"))
			.json(&json!({ "price": "15.00" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["price"], "15.00");
		assert_eq!(response.json::<serde_json::Value>()["name"], "Pine Ridge");

		let response = app.get(&format!("/campgrounds/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["comments"], json!([]));

		let response = app.delete(&format!("/campgrounds/{id}")).await;

		assert_eq!(response.status_code(), 204);

		let response = app.get(&format!("/campgrounds/{id}")).await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["content"],
			"unknown_campground"
		);
	}

	#[sqlx::test]
	async fn test_only_the_author_can_modify(pool: Database) {
		let app = app(pool.clone());
		register(&app, "john@smith.com", "johnny").await;

		let id = app.post("/campgrounds").json(&campground()).await.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.to_string();

		app.get("/auth/logout").await;

		let response = app
			.put(&format!("/campgrounds/{id}"))
			.json(&json!({ "name": "Mine now" }))
			.await;

		assert_eq!(response.status_code(), 401);

		register(&app, "jane@smith.com", "janedoe").await;

		let response = app
			.put(&format!("/campgrounds/{id}"))
			.json(&json!({ "name": "Mine now" }))
			.await;

		assert_eq!(response.status_code(), 403);

		let response = app.delete(&format!("/campgrounds/{id}")).await;

		assert_eq!(response.status_code(), 403);

		let response = app.get(&format!("/campgrounds/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["name"], "Pine Ridge");

		let response = app
			.delete(&format!("/campgrounds/{}", uuid::Uuid::new_v4()))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_search_and_pagination(pool: Database) {
		let app = app(pool);
		register(&app, "john@smith.com", "johnny").await;

		for name in ["Pine Ridge", "Pine Hollow", "Cedar Flats", "100% Wild"] {
			let mut body = campground();
			body["name"] = json!(name);

			app.post("/campgrounds").json(&body).await;
		}

		let response = app.get("/campgrounds").add_query_param("search", "pine").await;
		let page = response.json::<serde_json::Value>();

		assert_eq!(page["items"].as_array().unwrap().len(), 2);
		assert_eq!(page["total_pages"], 1);

		let response = app.get("/campgrounds").add_query_param("search", "%").await;

		assert_eq!(response.json::<serde_json::Value>()["items"].as_array().unwrap().len(), 1);

		let response = app
			.get("/campgrounds")
			.add_query_param("size", 3)
			.add_query_param("page", 2)
			.await;
		let page = response.json::<serde_json::Value>();

		assert_eq!(page["items"].as_array().unwrap().len(), 1);
		assert_eq!(page["page"], 2);
		assert_eq!(page["total_pages"], 2);

		let response = app.get("/campgrounds").add_query_param("size", 0).await;

		assert_eq!(response.status_code(), 400);
	}

	#[sqlx::test]
	async fn test_invalid_input_is_rejected(pool: Database) {
		let app = app(pool);
		register(&app, "john@smith.com", "johnny").await;

		let mut body = campground();
		body["lat"] = json!(120.0);

		let response = app.post("/campgrounds").json(&body).await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<serde_json::Value>()["errors"][0]["field"], "lat");

		let response = app.get("/campgrounds/not-a-uuid").await;

		assert_eq!(response.status_code(), 400);
	}
}
