use axum::{
	extract::{FromRef, FromRequestParts, OriginalUri},
	http::{header, request},
};
use uuid::Uuid;

use crate::{error::RouteError, route::auth, session, Database};

/// Extracts the session and related user from the request.
///
/// Any request without a valid session cookie is rejected with
/// [`auth::Error::LoginRequired`], which sends the client to the login page
/// and back to the original path afterwards.
///
/// Use `Option<Session>` for routes that are open to anonymous users.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: auth::model::User,
}

/// The path and query the client asked for, before any nesting was stripped.
fn requested_path(parts: &request::Parts) -> String {
	let uri = parts
		.extensions
		.get::<OriginalUri>()
		.map_or(&parts.uri, |original| &original.0);

	uri.path_and_query()
		.map_or_else(|| uri.path().to_string(), ToString::to_string)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let login_required = || auth::Error::LoginRequired {
			next: requested_path(parts),
		};

		let cookies = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok());

		let session_id = cookies
			.flat_map(cookie::Cookie::split_parse)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == session::COOKIE_NAME)
			.ok_or_else(login_required)?;

		let session_id = Uuid::parse_str(session_id.value()).map_err(|_| login_required())?;

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, auth::model::User>(
			r#"
				SELECT "user".* FROM "user"
				JOIN session ON session.user_id = "user".id
				WHERE session.id = ?
			"#,
		)
		.bind(session_id)
		.fetch_optional(&database)
		.await?;

		let user = user.ok_or_else(login_required)?;

		Ok(Session {
			user,
			id: session_id,
		})
	}
}

#[cfg(test)]
mod test {
	use axum::http::Request;

	use super::*;

	#[test]
	fn test_requested_path_keeps_query() {
		let (parts, ()) = Request::builder()
			.uri("http://localhost/posts/3/edit/?page=2")
			.body(())
			.unwrap()
			.into_parts();

		assert_eq!(requested_path(&parts), "/posts/3/edit/?page=2");
	}

	#[test]
	fn test_requested_path_prefers_original_uri() {
		let (mut parts, ()) = Request::builder()
			.uri("/login/")
			.body(())
			.unwrap()
			.into_parts();

		parts
			.extensions
			.insert(OriginalUri("/auth/login/".parse().unwrap()));

		assert_eq!(requested_path(&parts), "/auth/login/");
	}
}
