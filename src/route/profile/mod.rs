use axum::{http::StatusCode, routing::get, Router};

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown user {0}")]
	UnknownUser(String),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/profile/:username/", get(profile))
		.route("/profile/:username/follow/", get(profile_follow))
		.route("/profile/:username/unfollow/", get(profile_unfollow))
		.route("/follow/", get(follow_index))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownUser(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		let Self::UnknownUser(username) = self;

		error::Message::new("unknown_user")
			.detail("user", username)
			.into_vec()
	}
}
