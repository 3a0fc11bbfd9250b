use axum::{
	http::{header, StatusCode},
	response::{IntoResponse, Response},
	Router,
};

use crate::{
	error::{ErrorResponse, Message},
	AppState,
};

pub mod auth;
pub mod group;
pub mod model;
pub mod post;
pub mod profile;

pub use model::View;

/// Names of the templates each view is rendered with.
pub mod template {
	pub const INDEX: &str = "posts/index.html";
	pub const GROUP_LIST: &str = "posts/group_list.html";
	pub const PROFILE: &str = "posts/profile.html";
	pub const POST_DETAIL: &str = "posts/post_detail.html";
	pub const CREATE_POST: &str = "posts/create_post.html";
	pub const FOLLOW: &str = "posts/follow.html";
	pub const LOGIN: &str = "users/login.html";
	pub const LOGGED_OUT: &str = "users/logged_out.html";
}

/// Every page of the site, except the authentication routes under `/auth`.
pub fn routes() -> Router<AppState> {
	Router::new()
		.merge(post::routes())
		.merge(group::routes())
		.merge(profile::routes())
}

/// A `302 Found` redirect to `location`.
pub fn found(location: &str) -> Response {
	(StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Fallback for any path without a route.
pub async fn not_found() -> impl IntoResponse {
	(
		StatusCode::NOT_FOUND,
		axum::Json(ErrorResponse {
			success: false,
			errors: Message::new("not_found").into_vec(),
		}),
	)
}
