use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, MaybeSession, Path, Session},
	guard,
	model::Author,
	openapi::tag,
	route::model::IdInput,
	Database,
};

use super::{model, Error, RouteError};

/// Create comment
/// Leaves a comment on a campground.
#[route(tag = tag::COMMENT)]
pub async fn create_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<IdInput>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let author = Author::from(&session.user);
	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			INSERT INTO comment (campground_id, author_id, author_username, text)
			SELECT id, $2, $3, $4 FROM campground WHERE id = $1
			RETURNING *
		"#,
	)
	.bind(path.id)
	.bind(author.id)
	.bind(&author.username)
	.bind(&input.text)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownCampground(path.id))?))
}

/// Update comment
/// Updates the text of a comment. Only the author may do this.
#[route(tag = tag::COMMENT)]
pub async fn update_comment(
	State(database): State<Database>,
	session: MaybeSession,
	Path(path): Path<model::CommentPath>,
	Json(input): Json<model::UpdateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment: model::Comment = guard::authorize(&session, path.comment_id, &database).await?;

	if comment.campground_id != path.id {
		return Err(Error::UnknownComment(path.comment_id).into());
	}

	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			UPDATE comment
			SET text = COALESCE($1, text), updated_at = now()
			WHERE id = $2
			RETURNING *
		"#,
	)
	.bind(&input.text)
	.bind(comment.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment(path.comment_id))?))
}

/// Delete comment
/// Deletes a comment. Only the author may do this.
#[route(tag = tag::COMMENT, response(status = 204, description = "Deleted successfully."))]
pub async fn delete_comment(
	State(database): State<Database>,
	session: MaybeSession,
	Path(path): Path<model::CommentPath>,
) -> Result<impl IntoApiResponse, RouteError> {
	let comment: model::Comment = guard::authorize(&session, path.comment_id, &database).await?;

	if comment.campground_id != path.id {
		return Err(Error::UnknownComment(path.comment_id).into());
	}

	let deleted = sqlx::query("DELETE FROM comment WHERE id = $1")
		.bind(comment.id)
		.execute(&database)
		.await?;

	if deleted.rows_affected() == 0 {
		return Err(Error::UnknownComment(path.comment_id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}
