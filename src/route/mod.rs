use aide::axum::ApiRouter;

use crate::{ratelimit::Limits, AppState};

pub mod auth;
pub mod campground;
pub mod comment;
pub mod docs;
pub mod model;
pub mod profile;
pub mod review;

/// Every API route, grouped by resource.
pub fn routes(limits: Option<&Limits>) -> ApiRouter<AppState> {
	ApiRouter::new()
		.nest("/auth", auth::routes(limits.map(|limits| limits.secure.clone())))
		.nest(
			"/campgrounds",
			campground::routes()
				.merge(comment::routes())
				.merge(review::routes()),
		)
		.nest("/users", profile::routes())
		.nest("/docs", docs::routes())
}
