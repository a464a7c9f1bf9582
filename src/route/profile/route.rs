use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, MaybeSession, Path, Query},
	guard,
	openapi::tag,
	route::campground::model::Campground,
	Database,
};

use super::{model, Error, RouteError};

/// Get profile
/// Returns a user's public profile, along with a paginated response of the
/// campgrounds they listed, newest first.
#[route(tag = tag::PROFILE)]
pub async fn get_profile(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
	Query(paginate): Query<model::PaginateInput>,
) -> Result<Json<model::Profile>, RouteError> {
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE id = $1"#)
		.bind(path.id)
		.fetch_optional(&database)
		.await?
		.ok_or(Error::UnknownUser(path.id))?;

	let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campground WHERE author_id = $1")
		.bind(user.id)
		.fetch_one(&database)
		.await?;

	let campgrounds = sqlx::query_as::<_, Campground>(
		r#"
			SELECT * FROM campground
			WHERE author_id = $1
			ORDER BY created_at DESC, id
			LIMIT $2 OFFSET $3
		"#,
	)
	.bind(user.id)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(model::Profile {
		user,
		campgrounds: paginate.page(campgrounds, total),
	}))
}

/// Update profile
/// Updates a user's profile. Users may only update their own.
#[route(tag = tag::PROFILE)]
pub async fn update_profile(
	State(database): State<Database>,
	session: MaybeSession,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateUserInput>,
) -> Result<Json<model::User>, RouteError> {
	let user: model::User = guard::authorize(&session, path.id, &database).await?;

	let mut tx = database.begin().await?;

	let updated = sqlx::query_as::<_, model::User>(
		r#"
			UPDATE "user"
			SET
				email = COALESCE($1, email),
				username = COALESCE($2, username),
				firstname = COALESCE($3, firstname),
				lastname = COALESCE($4, lastname),
				avatar_url = COALESCE($5, avatar_url)
			WHERE id = $6
			RETURNING *
		"#,
	)
	.bind(&input.email)
	.bind(&input.username)
	.bind(&input.firstname)
	.bind(&input.lastname)
	.bind(&input.avatar_url)
	.bind(user.id)
	.fetch_optional(&mut *tx)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("user_email_key") => Error::EmailTaken.into(),
			Some("user_username_key") => Error::UsernameTaken.into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?
	.ok_or(Error::UnknownUser(path.id))?;

	if updated.username != user.username {
		for table in ["campground", "comment", "review"] {
			sqlx::query(&format!(
				"UPDATE {table} SET author_username = $1 WHERE author_id = $2"
			))
			.bind(&updated.username)
			.bind(updated.id)
			.execute(&mut *tx)
			.await?;
		}
	}

	tx.commit().await?;

	tracing::info!(user_id = %updated.id, "updated profile");

	Ok(Json(updated))
}
