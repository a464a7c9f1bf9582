pub use crate::route::model::{IdInput, Page, PaginateInput};

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{guard::Owned, model::Author, route::comment::model::Comment};

/// Accepts a non-negative amount with at most two decimal places, such as `12` or `12.50`.
fn validate_price(price: &str) -> Result<(), ValidationError> {
	let (whole, fraction) = price.split_once('.').unwrap_or((price, ""));

	let valid = !whole.is_empty()
		&& whole.chars().all(|c| c.is_ascii_digit())
		&& (!price.contains('.') || fraction.len() == 2)
		&& fraction.chars().all(|c| c.is_ascii_digit());

	if valid {
		Ok(())
	} else {
		Err(ValidationError::new("price"))
	}
}

fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
	if (-90.0..=90.0).contains(&lat) {
		Ok(())
	} else {
		Err(ValidationError::new("latitude"))
	}
}

fn validate_longitude(lng: f64) -> Result<(), ValidationError> {
	if (-180.0..=180.0).contains(&lng) {
		Ok(())
	} else {
		Err(ValidationError::new("longitude"))
	}
}

/// A single campground, listed by a user.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Campground {
	/// The unique identifier of the campground.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	#[validate(length(min = 1, max = 255))]
	pub name: String,
	/// The nightly price, formatted as a currency amount.
	#[validate(custom(function = "validate_price"))]
	pub price: String,
	#[validate(length(min = 1, max = 500))]
	pub description: String,
	/// A human-readable location, such as a town or park.
	#[validate(length(min = 1, max = 255))]
	pub location: String,
	#[validate(custom(function = "validate_latitude"))]
	pub lat: f64,
	#[validate(custom(function = "validate_longitude"))]
	pub lng: f64,
	/// A link to an already uploaded image.
	#[validate(url)]
	pub image_url: String,
	/// The user that listed the campground.
	#[serde(skip_deserializing)]
	#[sqlx(flatten)]
	pub author: Author,
	/// The mean rating over all reviews, or 0 if there are none.
	#[serde(skip_deserializing)]
	pub rating: f64,
	/// The creation time of the campground.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Owned for Campground {
	const KIND: &'static str = "campground";

	fn owner_id(&self) -> Uuid {
		self.author.id
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SearchInput {
	/// Only return campgrounds whose name contains this text, ignoring case.
	#[validate(length(max = 255))]
	pub search: Option<String>,
}

/// A campground together with its comments, newest first.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CampgroundDetail {
	#[serde(flatten)]
	pub campground: Campground,
	pub comments: Vec<Comment>,
}
