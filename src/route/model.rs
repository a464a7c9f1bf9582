use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn one() -> i64 {
	1
}

#[inline]
fn twelve() -> i64 {
	12
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct PaginateInput {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 1000))]
	#[serde(default = "one")]
	pub page: i64,
	/// The number of items to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "twelve")]
	pub size: i64,
}

impl PaginateInput {
	pub fn offset(&self) -> i64 {
		(self.page - 1) * self.size
	}

	pub fn limit(&self) -> i64 {
		self.size
	}

	/// The number of pages needed to show `total` items.
	pub fn total_pages(&self, total: i64) -> i64 {
		(total + self.size - 1) / self.size
	}

	/// Wraps one page of `items` out of `total`.
	pub fn page<T>(&self, items: Vec<T>, total: i64) -> Page<T> {
		Page {
			items,
			page: self.page,
			total_pages: self.total_pages(total),
		}
	}
}

/// A single page of a paginated listing.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Page<T> {
	pub items: Vec<T>,
	/// The page number (1-indexed).
	pub page: i64,
	pub total_pages: i64,
}

#[derive(Deserialize, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

/// Escapes `%`, `_` and `\` so that `text` matches literally in a `LIKE` pattern.
pub fn escape_like(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for c in text.chars() {
		if matches!(c, '%' | '_' | '\\') {
			escaped.push('\\');
		}

		escaped.push(c);
	}

	escaped
}
