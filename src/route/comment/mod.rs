use std::borrow::Cow;

use aide::axum::{
	routing::{post_with, put_with},
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
	#[error("unknown comment {0}")]
	UnknownComment(Uuid),
}

pub type RouteError = error::RouteError<Error>;

/// Routes nested under a single campground.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/:id/comments", post_with(create_comment, create_comment_docs))
		.api_route(
			"/:id/comments/:comment_id",
			put_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownCampground(..) | Self::UnknownComment(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownCampground(id) => vec![campground::unknown_campground(*id)],
			Self::UnknownComment(id) => vec![error::Message {
				content: "unknown_comment".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("comment".into(), json!(id));
					map
				})),
			}],
		}
	}
}
