use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, MaybeSession, Path, Query, Session},
	guard,
	model::Author,
	openapi::tag,
	route::model::{IdInput, Page, PaginateInput},
	store, AppState, Database,
};

use super::{model, Error, RouteError};

/// Get reviews
/// Returns a paginated response of a campground's reviews, newest first.
#[route(tag = tag::REVIEW)]
pub async fn get_reviews(
	State(database): State<Database>,
	Path(path): Path<IdInput>,
	Query(paginate): Query<model::ReviewPaginateInput>,
) -> Result<Json<Page<model::Review>>, RouteError> {
	let paginate = PaginateInput::from(paginate);

	let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM campground WHERE id = $1)")
		.bind(path.id)
		.fetch_one(&database)
		.await?;

	if !exists {
		return Err(Error::UnknownCampground(path.id).into());
	}

	let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM review WHERE campground_id = $1")
		.bind(path.id)
		.fetch_one(&database)
		.await?;

	let reviews = sqlx::query_as::<_, model::Review>(
		r#"
			SELECT * FROM review
			WHERE campground_id = $1
			ORDER BY created_at DESC, id
			LIMIT $2 OFFSET $3
		"#,
	)
	.bind(path.id)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(paginate.page(reviews, total)))
}

/// Create review
/// Reviews a campground and updates its rating.
#[route(tag = tag::REVIEW)]
pub async fn create_review(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<IdInput>,
	Json(input): Json<model::CreateReviewInput>,
) -> Result<Json<model::Review>, RouteError> {
	let author = Author::from(&session.user);
	let mut tx = database.begin().await?;

	if !store::lock_campground(&mut tx, path.id).await? {
		return Err(Error::UnknownCampground(path.id).into());
	}

	let review = sqlx::query_as::<_, model::Review>(
		r#"
			INSERT INTO review (campground_id, author_id, author_username, rating, text)
			VALUES ($1, $2, $3, $4, $5)
			RETURNING *
		"#,
	)
	.bind(path.id)
	.bind(author.id)
	.bind(&author.username)
	.bind(input.rating)
	.bind(&input.text)
	.fetch_one(&mut *tx)
	.await?;

	let rating = store::refresh_rating(&mut tx, path.id).await?;

	tx.commit().await?;

	tracing::info!(review_id = %review.id, campground_id = %path.id, rating, "created review");

	Ok(Json(review))
}

/// Update review
/// Updates a review and recomputes the campground's rating. Only the author
/// may do this, and only when review updates are enabled.
#[route(tag = tag::REVIEW)]
pub async fn update_review(
	State(state): State<AppState>,
	session: MaybeSession,
	Path(path): Path<model::ReviewPath>,
	Json(input): Json<model::UpdateReviewInput>,
) -> Result<Json<model::Review>, RouteError> {
	if !state.config.reviews.allow_update {
		return Err(Error::UpdateDisabled.into());
	}

	let review: model::Review = guard::authorize(&session, path.review_id, &state.database).await?;

	if review.campground_id != path.id {
		return Err(Error::UnknownReview(path.review_id).into());
	}

	let mut tx = state.database.begin().await?;

	if !store::lock_campground(&mut tx, path.id).await? {
		return Err(Error::UnknownCampground(path.id).into());
	}

	let review = sqlx::query_as::<_, model::Review>(
		r#"
			UPDATE review
			SET rating = COALESCE($1, rating), text = COALESCE($2, text), updated_at = now()
			WHERE id = $3
			RETURNING *
		"#,
	)
	.bind(input.rating)
	.bind(&input.text)
	.bind(review.id)
	.fetch_optional(&mut *tx)
	.await?
	.ok_or(Error::UnknownReview(path.review_id))?;

	store::refresh_rating(&mut tx, path.id).await?;

	tx.commit().await?;

	Ok(Json(review))
}

/// Delete review
/// Deletes a review and recomputes the campground's rating. Only the author
/// may do this, and only when review deletion is enabled.
#[route(tag = tag::REVIEW, response(status = 204, description = "Deleted successfully."))]
pub async fn delete_review(
	State(state): State<AppState>,
	session: MaybeSession,
	Path(path): Path<model::ReviewPath>,
) -> Result<impl IntoApiResponse, RouteError> {
	if !state.config.reviews.allow_delete {
		return Err(Error::DeleteDisabled.into());
	}

	let review: model::Review = guard::authorize(&session, path.review_id, &state.database).await?;

	if review.campground_id != path.id {
		return Err(Error::UnknownReview(path.review_id).into());
	}

	let mut tx = state.database.begin().await?;

	if !store::lock_campground(&mut tx, path.id).await? {
		return Err(Error::UnknownCampground(path.id).into());
	}

	let deleted = sqlx::query("DELETE FROM review WHERE id = $1")
		.bind(review.id)
		.execute(&mut *tx)
		.await?;

	if deleted.rows_affected() == 0 {
		return Err(Error::UnknownReview(path.review_id).into());
	}

	store::refresh_rating(&mut tx, path.id).await?;

	tx.commit().await?;

	Ok(StatusCode::NO_CONTENT.into_response())
}
