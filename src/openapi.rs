use std::borrow::Cow;

use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const CAMPGROUND: &str = "Campground";
	pub const COMMENT: &str = "Comment";
	pub const REVIEW: &str = "Review";
	pub const PROFILE: &str = "Profile";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Campground API")
		.summary("Browse, list and review campgrounds")
		.description(
			"Campgrounds are listed by registered users, who may then be commented on and \
			 reviewed by others. Only the author of a campground, comment or review may \
			 change or delete it.",
		)
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("Accounts, sessions and password resets".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::CAMPGROUND.into(),
			description: Some("Campground listings".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comments on a campground".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::REVIEW.into(),
			description: Some("Rated reviews of a campground".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::PROFILE.into(),
			description: Some("Public user profiles".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorResponse>, _>(|res| {
			res.example(error::ErrorResponse {
				success: false,
				errors: vec![error::Message {
					content: "unknown_campground".into(),
					field: None,
					details: Some(Cow::Owned({
						let mut map = error::Map::new();
						map.insert(
							"campground".into(),
							serde_json::json!("00000000-0000-0000-0000-000000000000"),
						);
						map
					})),
				}],
			})
		})
}
