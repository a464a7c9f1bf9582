//! Load-then-authorize checks run before every protected mutation.
//!
//! A single generic [`authorize`] covers campgrounds, comments, reviews and
//! user profiles. Entities describe their owner through [`Owned`], and are
//! fetched through a [`Loader`], which the database pool implements for every
//! [`Record`](crate::store::Record).

use std::borrow::Cow;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::error::{self, Message};

/// The requester's identity, as far as authorization is concerned.
pub trait Identity {
	/// The id of the authenticated user, if there is one.
	fn current_user_id(&self) -> Option<Uuid>;

	/// Whether the requester is authenticated.
	fn is_authenticated(&self) -> bool {
		self.current_user_id().is_some()
	}
}

/// An entity with a single owning user.
pub trait Owned {
	/// The name of the entity, used in error messages and logs.
	const KIND: &'static str;

	/// The id of the owning user. Never a username snapshot.
	fn owner_id(&self) -> Uuid;
}

/// Fetches a single entity by its id.
#[axum::async_trait]
pub trait Loader<E: Send>: Sync {
	async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, sqlx::Error>;
}

/// The reason a guarded action was refused.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("not authenticated")]
	Unauthenticated,
	#[error("unknown {kind} {id}")]
	NotFound { kind: &'static str, id: Uuid },
	#[error("user {user_id} does not own {kind} {id}")]
	Forbidden {
		kind: &'static str,
		id: Uuid,
		user_id: Uuid,
	},
	#[error("failed to load entity: {0}")]
	Infrastructure(#[from] sqlx::Error),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Unauthenticated => StatusCode::UNAUTHORIZED,
			Self::NotFound { .. } => StatusCode::NOT_FOUND,
			Self::Forbidden { .. } => StatusCode::FORBIDDEN,
			Self::Infrastructure(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Unauthenticated => vec![Message::new("unauthenticated")],
			Self::NotFound { kind, id } => vec![Message {
				content: format!("unknown_{kind}").into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert((*kind).into(), json!(id));
					map
				})),
			}],
			Self::Forbidden { kind, id, .. } => vec![Message {
				content: "forbidden".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert((*kind).into(), json!(id));
					map
				})),
			}],
			Self::Infrastructure(..) => Vec::new(),
		}
	}
}

/// Loads the entity `id` and checks that the requester owns it.
///
/// Unauthenticated requesters are refused before the loader is called.
/// Ownership is decided by comparing user ids only.
#[tracing::instrument(skip(identity, loader), fields(kind = E::KIND))]
pub async fn authorize<E, I, L>(identity: &I, id: Uuid, loader: &L) -> Result<E, Error>
where
	E: Owned + Send,
	I: Identity + ?Sized,
	L: Loader<E> + ?Sized,
{
	if !identity.is_authenticated() {
		return Err(Error::Unauthenticated);
	}

	let user_id = identity.current_user_id().ok_or(Error::Unauthenticated)?;

	let entity = match loader.find_by_id(id).await {
		Ok(Some(entity)) => entity,
		Ok(None) => return Err(Error::NotFound { kind: E::KIND, id }),
		Err(error) => {
			tracing::error!(%error, "failed to load {}", E::KIND);
			return Err(Error::Infrastructure(error));
		}
	};

	if entity.owner_id() != user_id {
		tracing::warn!(%user_id, owner_id = %entity.owner_id(), "ownership mismatch");

		return Err(Error::Forbidden {
			kind: E::KIND,
			id,
			user_id,
		});
	}

	Ok(entity)
}
