use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{guard::Owned, model::Author};

/// A comment left on a campground.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The campground the comment belongs to.
	#[serde(skip_deserializing)]
	pub campground_id: Uuid,
	#[validate(length(min = 1, max = 2000))]
	pub text: String,
	#[serde(skip_deserializing)]
	#[sqlx(flatten)]
	pub author: Author,
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
	#[serde(skip_deserializing)]
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Owned for Comment {
	const KIND: &'static str = "comment";

	fn owner_id(&self) -> Uuid {
		self.author.id
	}
}

#[derive(Deserialize, JsonSchema)]
pub struct CommentPath {
	/// The campground id.
	pub id: Uuid,
	pub comment_id: Uuid,
}
