pub use crate::route::{
	auth::model::{UpdateUserInput, User},
	model::{IdInput, Page, PaginateInput},
};

use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

use crate::{guard::Owned, route::campground::model::Campground};

/// Users own their own profile.
impl Owned for User {
	const KIND: &'static str = "user";

	fn owner_id(&self) -> Uuid {
		self.id
	}
}

/// A user's public profile with a page of the campgrounds they listed.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Profile {
	#[serde(flatten)]
	pub user: User,
	pub campgrounds: Page<Campground>,
}
