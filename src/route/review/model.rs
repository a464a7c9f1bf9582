use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{guard::Owned, model::Author, route::model::PaginateInput};

#[inline]
fn one() -> i64 {
	1
}

#[inline]
fn five() -> i64 {
	5
}

/// A rated review of a campground.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Review {
	/// The unique identifier of the review.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The campground being reviewed.
	#[serde(skip_deserializing)]
	pub campground_id: Uuid,
	/// A whole number of stars, from 1 to 5.
	#[validate(range(min = 1, max = 5))]
	pub rating: i16,
	#[validate(length(max = 2000))]
	#[serde(default)]
	pub text: String,
	#[serde(skip_deserializing)]
	#[sqlx(flatten)]
	pub author: Author,
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
	#[serde(skip_deserializing)]
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Owned for Review {
	const KIND: &'static str = "review";

	fn owner_id(&self) -> Uuid {
		self.author.id
	}
}

#[derive(Deserialize, JsonSchema)]
pub struct ReviewPath {
	/// The campground id.
	pub id: Uuid,
	pub review_id: Uuid,
}

/// Pagination for reviews, which are shown five at a time by default.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct ReviewPaginateInput {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 1000))]
	#[serde(default = "one")]
	pub page: i64,
	/// The number of reviews to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "five")]
	pub size: i64,
}

impl From<ReviewPaginateInput> for PaginateInput {
	fn from(input: ReviewPaginateInput) -> Self {
		Self {
			page: input.page,
			size: input.size,
		}
	}
}
