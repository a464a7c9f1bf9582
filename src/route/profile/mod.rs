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
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/:id",
		get_with(get_profile, get_profile_docs).put_with(update_profile, update_profile_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownUser(..) => StatusCode::NOT_FOUND,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownUser(id) => vec![error::Message {
				content: "unknown_user".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("user".into(), json!(id));
					map
				})),
			}],
			Self::UsernameTaken => vec![error::Message {
				content: self.to_string().into(),
				field: Some("username".into()),
				details: None,
			}],
			Self::EmailTaken => vec![error::Message {
				content: self.to_string().into(),
				field: Some("email".into()),
				details: None,
			}],
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_profile_lists_campgrounds(pool: Database) {
		let app = app(pool);
		let user_id = register(&app, "john@smith.com", "johnny").await;

		create_campground(&app).await;
		create_campground(&app).await;

		let response = app.get(&format!("/users/{user_id}")).await;

		assert_eq!(response.status_code(), 200);

		let profile = response.json::<serde_json::Value>();

		assert_eq!(profile["username"], "johnny");
		assert!(profile.get("email").is_none());
		assert_eq!(profile["campgrounds"]["items"].as_array().unwrap().len(), 2);

		let response = app.get(&format!("/users/{}", uuid::Uuid::new_v4())).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_profile_update_is_guarded(pool: Database) {
		let app = app(pool);
		let john = register(&app, "john@smith.com", "johnny").await;
		let campground = create_campground(&app).await;

		let response = app
			.put(&format!("/users/{john}"))
			.json(&json!({ "username": "johnathan", "firstname": "John" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["username"], "johnathan");

		// Author snapshots follow the new username.
		let response = app.get(&format!("/campgrounds/{campground}")).await;

		assert_eq!(
			response.json::<serde_json::Value>()["author"]["username"],
			"johnathan"
		);

		let jane = register(&app, "jane@smith.com", "janedoe").await;

		let response = app
			.put(&format!("/users/{john}"))
			.json(&json!({ "firstname": "Jane" }))
			.await;

		assert_eq!(response.status_code(), 403);

		let response = app
			.put(&format!("/users/{jane}"))
			.json(&json!({ "username": "johnathan" }))
			.await;

		assert_eq!(response.status_code(), 409);
	}
}
