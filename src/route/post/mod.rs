use axum::{
	http::StatusCode,
	routing::{get, post},
	Router,
};

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(i64),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/", get(index))
		.route("/create/", get(create_page).post(post_create))
		.route("/posts/:id/", get(post_detail))
		.route("/posts/:id/edit/", get(edit_page).post(post_edit))
		.route("/posts/:id/comment/", post(add_comment))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		let message = error::Message::new("unknown_post");
		let Self::UnknownPost(post) = self;

		message.detail("post", post).into_vec()
	}
}
