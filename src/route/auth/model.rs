use axum::http::Uri;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username.chars().any(|c| !c.is_alphanumeric()) {
		return Err(ValidationError::new("username must be alphanumeric"));
	}

	Ok(())
}

/// A single user.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The hashed password.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// The username that is displayed to the public, and used in profile urls.
	pub username: String,
	/// The creation time of the user.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Session {
	/// The session id.
	#[serde(rename = "session_id")]
	pub id: Uuid,
	/// The user that owns the session.
	#[serde(skip)]
	pub user_id: Uuid,
	/// The creation time of the session.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Validate)]
pub struct LoginInput {
	#[validate(length(min = 1, max = 16))]
	pub username: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct SignupInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	/// The username that is displayed to the public.
	#[validate(length(min = 3, max = 16), custom(function = "validate_username"))]
	pub username: String,
}

/// Where to send the user once they have logged in.
#[derive(Deserialize, Validate)]
pub struct NextQuery {
	pub next: Option<String>,
}

impl NextQuery {
	/// The `next` target, if it is a path on this site.
	///
	/// Browsers treat a backslash like a slash, so `/\host` would leave the site
	/// just like `//host`.
	pub fn local(&self) -> Option<&str> {
		self.next.as_deref().filter(|next| is_local_path(next))
	}
}

fn is_local_path(next: &str) -> bool {
	if !next.starts_with('/') || next.starts_with("//") {
		return false;
	}

	if next.chars().any(|c| c == '\\' || c.is_control()) {
		return false;
	}

	// Decoded non-ASCII paths do not parse, but they cannot name a host either.
	!matches!(
		next.parse::<Uri>(),
		Ok(uri) if uri.scheme().is_some() || uri.authority().is_some()
	)
}

#[derive(Serialize)]
pub struct LoginContext {
	pub next: Option<String>,
}
