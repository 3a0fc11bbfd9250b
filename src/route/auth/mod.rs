use axum::{
	http::StatusCode,
	routing::{get, post},
	Router,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{error, AppState};

pub mod model;
pub mod route;

pub const LOGIN_PATH: &str = "/auth/login/";

/// Characters escaped in the `next` parameter. Slashes are kept readable.
const NEXT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'/')
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~');

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid username or password")]
	InvalidUsernameOrPassword,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("login required to access {next}")]
	LoginRequired { next: String },
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/login/", get(login_page).post(login))
		.route("/logout/", get(logout))
		.route("/signup/", post(signup))
		.route("/me/", get(get_me).delete(delete_me))
}

/// The login page url, remembering where to send the user afterwards.
pub fn login_url(next: &str) -> String {
	format!("{LOGIN_PATH}?next={}", utf8_percent_encode(next, NEXT))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidUsernameOrPassword => StatusCode::UNAUTHORIZED,
			Self::LoginRequired { .. } => StatusCode::FOUND,
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		error::Message::new(self.to_string()).into_vec()
	}

	fn redirect(&self) -> Option<String> {
		match self {
			Self::LoginRequired { next } => Some(login_url(next)),
			_ => None,
		}
	}
}
