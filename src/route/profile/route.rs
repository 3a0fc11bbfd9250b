use axum::{extract::State, response::Response};
use uuid::Uuid;

use crate::{
	extract::{Path, Query, Session},
	route::{auth::model::User, found, post::model::PostFilter, template, View},
	Database,
};

use super::{model, Error, RouteError};

fn to_profile(username: &str) -> Response {
	found(&format!("/profile/{username}/"))
}

/// Whether `user` follows `author`.
async fn is_following(database: &Database, user: Uuid, author: Uuid) -> Result<bool, sqlx::Error> {
	let edges = sqlx::query_scalar::<_, i64>(
		"SELECT COUNT(*) FROM follow WHERE user_id = ? AND author_id = ?",
	)
	.bind(user)
	.bind(author)
	.fetch_one(database)
	.await?;

	Ok(edges > 0)
}

/// Profile
/// Returns an author and a page of their posts, newest first, along with
/// whether the viewer follows them.
pub async fn profile(
	State(database): State<Database>,
	session: Option<Session>,
	Path(path): Path<model::UsernameInput>,
	Query(query): Query<model::PageQuery>,
) -> Result<View<model::ProfileContext>, RouteError> {
	let author = User::by_username(&database, &path.username)
		.await?
		.ok_or_else(|| Error::UnknownUser(path.username.clone()))?;

	let following = match session {
		Some(session) => is_following(&database, session.user.id, author.id).await?,
		None => false,
	};

	let page_obj = PostFilter::Author(author.id)
		.page(&database, query.page())
		.await?;

	Ok(View::new(
		template::PROFILE,
		model::ProfileContext {
			count_posts: page_obj.count,
			author,
			following,
			page_obj,
		},
	))
}

/// Follow feed
/// Returns a page of posts by every author the current user follows, newest first.
pub async fn follow_index(
	State(database): State<Database>,
	session: Session,
	Query(query): Query<model::PageQuery>,
) -> Result<View<model::FollowContext>, RouteError> {
	let page_obj = PostFilter::FollowedBy(session.user.id)
		.page(&database, query.page())
		.await?;

	Ok(View::new(template::FOLLOW, model::FollowContext { page_obj }))
}

/// Follow author
/// Follows an author, unless already following them or following oneself.
#[tracing::instrument(skip_all, fields(user = %session.user.username, author = %path.username))]
pub async fn profile_follow(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::UsernameInput>,
) -> Result<Response, RouteError> {
	let author = User::by_username(&database, &path.username)
		.await?
		.ok_or_else(|| Error::UnknownUser(path.username.clone()))?;

	if author.id == session.user.id {
		tracing::debug!("ignored self-follow");
		return Ok(to_profile(&author.username));
	}

	let created = sqlx::query(
		r#"
			INSERT INTO follow (user_id, author_id)
			SELECT ?, ?
			WHERE NOT EXISTS (
				SELECT 1 FROM follow WHERE user_id = ? AND author_id = ?
			)
		"#,
	)
	.bind(session.user.id)
	.bind(author.id)
	.bind(session.user.id)
	.bind(author.id)
	.execute(&database)
	.await?
	.rows_affected();

	if created > 0 {
		tracing::info!("followed");
	}

	Ok(to_profile(&author.username))
}

/// Unfollow author
/// Stops following an author. Not following them is not an error.
#[tracing::instrument(skip_all, fields(user = %session.user.username, author = %path.username))]
pub async fn profile_unfollow(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::UsernameInput>,
) -> Result<Response, RouteError> {
	sqlx::query(
		r#"
			DELETE FROM follow
			WHERE user_id = ?
			AND author_id IN (SELECT id FROM "user" WHERE username = ?)
		"#,
	)
	.bind(session.user.id)
	.bind(&path.username)
	.execute(&database)
	.await?;

	Ok(to_profile(&path.username))
}
