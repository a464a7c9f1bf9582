//! Database access shared between resources.

use sqlx::{postgres::PgRow, PgConnection};
use uuid::Uuid;

use crate::{
	guard::{Loader, Owned},
	rating,
	route::{auth::model::User, campground::model::Campground, comment::model::Comment, review::model::Review},
	Database,
};

/// An entity stored in its own table that can be fetched by id.
pub trait Record: Owned + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin + 'static {
	/// Selects a single row, binding the id as `$1`.
	const FIND_BY_ID: &'static str;
}

impl Record for Campground {
	const FIND_BY_ID: &'static str = "SELECT * FROM campground WHERE id = $1";
}

impl Record for Comment {
	const FIND_BY_ID: &'static str = "SELECT * FROM comment WHERE id = $1";
}

impl Record for Review {
	const FIND_BY_ID: &'static str = "SELECT * FROM review WHERE id = $1";
}

impl Record for User {
	const FIND_BY_ID: &'static str = r#"SELECT * FROM "user" WHERE id = $1"#;
}

#[axum::async_trait]
impl<E: Record> Loader<E> for Database {
	async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, sqlx::Error> {
		sqlx::query_as::<_, E>(E::FIND_BY_ID)
			.bind(id)
			.fetch_optional(self)
			.await
	}
}

/// Locks a campground row for the rest of the transaction.
///
/// Review writes take this lock first, so rating recomputations for the same
/// campground never interleave. Returns `false` if the campground does not exist.
pub async fn lock_campground(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
	let row = sqlx::query_scalar::<_, Uuid>("SELECT id FROM campground WHERE id = $1 FOR UPDATE")
		.bind(id)
		.fetch_optional(&mut *conn)
		.await?;

	Ok(row.is_some())
}

/// Recomputes the rating of a campground from all of its reviews and stores it.
pub async fn refresh_rating(conn: &mut PgConnection, campground_id: Uuid) -> Result<f64, sqlx::Error> {
	let reviews = sqlx::query_as::<_, Review>("SELECT * FROM review WHERE campground_id = $1")
		.bind(campground_id)
		.fetch_all(&mut *conn)
		.await?;

	let rating = rating::recompute_average(&reviews);

	sqlx::query("UPDATE campground SET rating = $1 WHERE id = $2")
		.bind(rating)
		.bind(campground_id)
		.execute(&mut *conn)
		.await?;

	tracing::debug!(%campground_id, rating, reviews = reviews.len(), "refreshed rating");

	Ok(rating)
}

/// Deletes a campground along with its comments and reviews.
///
/// Either everything is removed or nothing is. Returns `false` if the
/// campground did not exist.
pub async fn delete_campground(database: &Database, id: Uuid) -> Result<bool, sqlx::Error> {
	let mut tx = database.begin().await?;

	let comments = sqlx::query("DELETE FROM comment WHERE campground_id = $1")
		.bind(id)
		.execute(&mut *tx)
		.await?
		.rows_affected();

	let reviews = sqlx::query("DELETE FROM review WHERE campground_id = $1")
		.bind(id)
		.execute(&mut *tx)
		.await?
		.rows_affected();

	let deleted = sqlx::query("DELETE FROM campground WHERE id = $1")
		.bind(id)
		.execute(&mut *tx)
		.await?
		.rows_affected();

	tx.commit().await?;

	tracing::info!(campground_id = %id, comments, reviews, "deleted campground");

	Ok(deleted > 0)
}
