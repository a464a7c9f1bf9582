use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::route::auth::model::User;

/// The author of a campground, comment or review.
///
/// The username is a snapshot taken when the content was written, kept for
/// display only. Authorization always compares [`Author::id`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Author {
	/// The unique identifier of the user.
	#[sqlx(rename = "author_id")]
	pub id: Uuid,
	/// The username of the user at the time of writing.
	#[sqlx(rename = "author_username")]
	pub username: String,
}

impl From<&User> for Author {
	fn from(user: &User) -> Self {
		Self {
			id: user.id,
			username: user.username.clone(),
		}
	}
}
