use axum::{
	extract::{OriginalUri, State},
	http::{header, StatusCode},
	response::{IntoResponse, Response},
};
use bytes::Bytes;
use chrono::Utc;

use crate::{
	extract::{Form, Path, Query, Session},
	form::{Bound, CommentForm, PostForm},
	route::{found, group::model::Group, template, View},
	AppState, Database,
};

use super::{
	model::{self, Comment, Post, PostFilter},
	Error, RouteError,
};

fn to_detail(post_id: i64) -> Response {
	found(&format!("/posts/{post_id}/"))
}

fn cached(body: Bytes) -> Response {
	([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// All posts
/// Returns a page of every post, newest first. The rendered page is cached
/// for a while, so new posts can take some time to show up.
pub async fn index(
	State(state): State<AppState>,
	OriginalUri(uri): OriginalUri,
	Query(query): Query<model::PageQuery>,
) -> Result<Response, RouteError> {
	let key = uri
		.path_and_query()
		.map_or_else(|| uri.path().to_string(), ToString::to_string);

	if let Some(body) = state.cache.get(&key).await {
		return Ok(cached(body));
	}

	let page_obj = PostFilter::All.page(&state.database, query.page()).await?;
	let view = View::new(template::INDEX, model::IndexContext { page_obj });
	let body = Bytes::from(serde_json::to_vec(&view)?);

	state.cache.insert(key, body.clone()).await;

	Ok(cached(body))
}

/// Single post
/// Returns a post by its id, with its comments and an empty comment form.
pub async fn post_detail(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<View<model::PostDetailContext>, RouteError> {
	let post = Post::find(&database, path.id)
		.await?
		.ok_or(Error::UnknownPost(path.id))?;

	let posts_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post WHERE author_id = ?")
		.bind(post.author_id)
		.fetch_one(&database)
		.await?;

	let comments = Comment::for_post(&database, post.id).await?;

	Ok(View::new(
		template::POST_DETAIL,
		model::PostDetailContext {
			post_title: post.title(),
			posts_count,
			post,
			comments,
			form: Bound::unbound(CommentForm::default()),
		},
	))
}

/// New post form
/// Returns an empty post form and the groups to choose from.
pub async fn create_page(
	State(database): State<Database>,
	_session: Session,
) -> Result<View<model::PostFormContext>, RouteError> {
	Ok(View::new(
		template::CREATE_POST,
		model::PostFormContext {
			form: Bound::unbound(PostForm::default()),
			groups: Group::all(&database).await?,
			is_edit: false,
			post: None,
		},
	))
}

/// Create post
/// Publishes a new post as the current user, then redirects to their profile.
#[tracing::instrument(skip_all, fields(author = %session.user.username))]
pub async fn post_create(
	State(database): State<Database>,
	session: Session,
	Form(form): Form<PostForm>,
) -> Result<Response, RouteError> {
	let errors = form.clean(&database).await?;

	if !errors.is_empty() {
		let context = model::PostFormContext {
			form: Bound::new(form, errors),
			groups: Group::all(&database).await?,
			is_edit: false,
			post: None,
		};

		return Ok((
			StatusCode::BAD_REQUEST,
			View::new(template::CREATE_POST, context),
		)
			.into_response());
	}

	let post = sqlx::query(
		r#"
			INSERT INTO post (text, pub_date, author_id, group_id, image)
			VALUES (?, ?, ?, ?, ?)
		"#,
	)
	.bind(&form.text)
	.bind(Utc::now())
	.bind(session.user.id)
	.bind(form.group)
	.bind(&form.image)
	.execute(&database)
	.await?
	.last_insert_rowid();

	tracing::info!(post, "post created");

	Ok(found(&format!("/profile/{}/", session.user.username)))
}

/// Edit post form
/// Returns the post form filled in with the post. Only the author may edit a
/// post; anyone else is sent back to the post.
pub async fn edit_page(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<Response, RouteError> {
	let post = Post::find(&database, path.id)
		.await?
		.ok_or(Error::UnknownPost(path.id))?;

	if post.author_id != session.user.id {
		return Ok(to_detail(post.id));
	}

	let form = PostForm {
		text: post.text.clone(),
		group: post.group_id,
		image: post.image.clone(),
	};

	Ok(View::new(
		template::CREATE_POST,
		model::PostFormContext {
			form: Bound::unbound(form),
			groups: Group::all(&database).await?,
			is_edit: true,
			post: Some(post),
		},
	)
	.into_response())
}

/// Edit post
/// Replaces the text and group of a post written by the current user. The
/// image is only replaced when a new one is given, and the publication date
/// never changes.
#[tracing::instrument(skip_all, fields(post = path.id, editor = %session.user.username))]
pub async fn post_edit(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Form(form): Form<PostForm>,
) -> Result<Response, RouteError> {
	let post = Post::find(&database, path.id)
		.await?
		.ok_or(Error::UnknownPost(path.id))?;

	if post.author_id != session.user.id {
		tracing::warn!("edit rejected, not the author");
		return Ok(to_detail(post.id));
	}

	let errors = form.clean(&database).await?;

	if !errors.is_empty() {
		let context = model::PostFormContext {
			form: Bound::new(form, errors),
			groups: Group::all(&database).await?,
			is_edit: true,
			post: Some(post),
		};

		return Ok((
			StatusCode::BAD_REQUEST,
			View::new(template::CREATE_POST, context),
		)
			.into_response());
	}

	sqlx::query(
		r#"
			UPDATE post
			SET text = ?, group_id = ?, image = COALESCE(?, image)
			WHERE id = ? AND author_id = ?
		"#,
	)
	.bind(&form.text)
	.bind(form.group)
	.bind(&form.image)
	.bind(post.id)
	.bind(session.user.id)
	.execute(&database)
	.await?;

	Ok(to_detail(post.id))
}

/// Comment on post
/// Leaves a comment on a post as the current user. The client is sent back to
/// the post whether or not the comment was valid.
#[tracing::instrument(skip_all, fields(post = path.id, author = %session.user.username))]
pub async fn add_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Form(form): Form<CommentForm>,
) -> Result<Response, RouteError> {
	let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post WHERE id = ?")
		.bind(path.id)
		.fetch_one(&database)
		.await?;

	if exists == 0 {
		return Err(Error::UnknownPost(path.id).into());
	}

	if form.clean().is_empty() {
		sqlx::query(
			r#"
				INSERT INTO comment (post_id, author_id, text, created)
				VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(path.id)
		.bind(session.user.id)
		.bind(&form.text)
		.bind(Utc::now())
		.execute(&database)
		.await?;
	} else {
		tracing::debug!("comment rejected by validation");
	}

	Ok(to_detail(path.id))
}
