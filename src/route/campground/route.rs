use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, MaybeSession, Path, Query, Session},
	guard,
	model::Author,
	openapi::tag,
	route::{comment::model::Comment, model::escape_like},
	store, Database,
};

use super::{model, Error, RouteError};

/// Get campgrounds
/// Returns a paginated response of campgrounds, newest first, optionally
/// filtered by a case-insensitive search on the name.
#[route(tag = tag::CAMPGROUND)]
pub async fn get_campgrounds(
	State(database): State<Database>,
	Query(paginate): Query<model::PaginateInput>,
	Query(search): Query<model::SearchInput>,
) -> Result<Json<model::Page<model::Campground>>, RouteError> {
	let pattern = search
		.search
		.as_deref()
		.map(str::trim)
		.filter(|search| !search.is_empty())
		.map(|search| format!("%{}%", escape_like(search)));

	let total = sqlx::query_scalar::<_, i64>(
		r#"
			SELECT COUNT(*) FROM campground
			WHERE $1::text IS NULL OR name ILIKE $1
		"#,
	)
	.bind(&pattern)
	.fetch_one(&database)
	.await?;

	let campgrounds = sqlx::query_as::<_, model::Campground>(
		r#"
			SELECT * FROM campground
			WHERE $1::text IS NULL OR name ILIKE $1
			ORDER BY created_at DESC, id
			LIMIT $2 OFFSET $3
		"#,
	)
	.bind(&pattern)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(paginate.page(campgrounds, total)))
}

/// Get single campground
/// Returns a single campground by its unique id, along with its comments.
#[route(tag = tag::CAMPGROUND)]
pub async fn get_campground(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::CampgroundDetail>, RouteError> {
	let campground = sqlx::query_as::<_, model::Campground>("SELECT * FROM campground WHERE id = $1")
		.bind(path.id)
		.fetch_optional(&database)
		.await?
		.ok_or(Error::UnknownCampground(path.id))?;

	let comments = sqlx::query_as::<_, Comment>(
		r#"
			SELECT * FROM comment
			WHERE campground_id = $1
			ORDER BY created_at DESC, id
		"#,
	)
	.bind(path.id)
	.fetch_all(&database)
	.await?;

	Ok(Json(model::CampgroundDetail {
		campground,
		comments,
	}))
}

/// Create campground
/// Lists a new campground, authored by the current user.
#[route(tag = tag::CAMPGROUND)]
pub async fn create_campground(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateCampgroundInput>,
) -> Result<Json<model::Campground>, RouteError> {
	let author = Author::from(&session.user);
	let campground = sqlx::query_as::<_, model::Campground>(
		r#"
			INSERT INTO campground
				(author_id, author_username, name, price, description, location, lat, lng, image_url)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
			RETURNING *
		"#,
	)
	.bind(author.id)
	.bind(&author.username)
	.bind(&input.name)
	.bind(&input.price)
	.bind(&input.description)
	.bind(&input.location)
	.bind(input.lat)
	.bind(input.lng)
	.bind(&input.image_url)
	.fetch_one(&database)
	.await?;

	tracing::info!(campground_id = %campground.id, author_id = %author.id, "created campground");

	Ok(Json(campground))
}

/// Update campground
/// Updates an existing campground by its unique id. Only the author may do this.
#[route(tag = tag::CAMPGROUND)]
pub async fn update_campground(
	State(database): State<Database>,
	session: MaybeSession,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateCampgroundInput>,
) -> Result<Json<model::Campground>, RouteError> {
	let campground: model::Campground = guard::authorize(&session, path.id, &database).await?;

	let campground = sqlx::query_as::<_, model::Campground>(
		r#"
			UPDATE campground
			SET
				name = COALESCE($1, name),
				price = COALESCE($2, price),
				description = COALESCE($3, description),
				location = COALESCE($4, location),
				lat = COALESCE($5, lat),
				lng = COALESCE($6, lng),
				image_url = COALESCE($7, image_url)
			WHERE id = $8
			RETURNING *
		"#,
	)
	.bind(&input.name)
	.bind(&input.price)
	.bind(&input.description)
	.bind(&input.location)
	.bind(input.lat)
	.bind(input.lng)
	.bind(&input.image_url)
	.bind(campground.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(campground.ok_or(Error::UnknownCampground(path.id))?))
}

/// Delete campground
/// Deletes an existing campground by its unique id, along with all of its
/// comments and reviews. Only the author may do this.
#[route(tag = tag::CAMPGROUND, response(status = 204, description = "Deleted successfully."))]
pub async fn delete_campground(
	State(database): State<Database>,
	session: MaybeSession,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let campground: model::Campground = guard::authorize(&session, path.id, &database).await?;

	if !store::delete_campground(&database, campground.id).await? {
		return Err(Error::UnknownCampground(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}
