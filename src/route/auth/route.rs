use argon2::Argon2;
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::{IntoResponse, Response},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
	extract::{Json, Query, Session},
	route::{found, template, View},
	session, AppState, Database,
};

use super::{model, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and creating a new password,
/// the scope of this function can remain in here with no issues.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Starts a new session for the user and returns its cookie alongside it.
async fn create_session(
	database: &Database,
	user_id: Uuid,
) -> Result<(model::Session, cookie::Cookie<'static>), sqlx::Error> {
	let session = model::Session {
		id: Uuid::new_v4(),
		user_id,
		created_at: Utc::now(),
	};

	sqlx::query("INSERT INTO session (id, user_id, created_at) VALUES (?, ?, ?)")
		.bind(session.id)
		.bind(session.user_id)
		.bind(session.created_at)
		.execute(database)
		.await?;

	let cookie = session::create_cookie(session.id);

	Ok((session, cookie))
}

/// Log in page
/// Shows the login form, carrying the page to return to.
pub async fn login_page(Query(next): Query<model::NextQuery>) -> View<model::LoginContext> {
	View::new(
		template::LOGIN,
		model::LoginContext {
			next: next.local().map(ToString::to_string),
		},
	)
}

/// Log in
/// Logs in to an account, setting a session cookie. When a local `next` path
/// is given, the client is redirected there.
#[tracing::instrument(skip_all, fields(username = %auth.username))]
pub async fn login(
	State(state): State<AppState>,
	Query(next): Query<model::NextQuery>,
	Json(auth): Json<model::LoginInput>,
) -> Result<Response, RouteError> {
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE username = ?"#)
		.bind(&auth.username)
		.fetch_optional(&state.database)
		.await?;

	let Some(user) = user else {
		return Err(Error::InvalidUsernameOrPassword.into());
	};

	let hashed = hash_password(&state.hasher, &auth.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		tracing::info!("rejected login");
		return Err(Error::InvalidUsernameOrPassword.into());
	}

	let (session, cookie) = create_session(&state.database, user.id).await?;
	let set_cookie = [(header::SET_COOKIE, cookie.to_string())];

	Ok(match next.local() {
		Some(next) => (set_cookie, found(next)).into_response(),
		None => (set_cookie, Json(session)).into_response(),
	})
}

/// Log out
/// Logs out of the authenticated account and clears the session cookie.
pub async fn logout(
	State(database): State<Database>,
	session: Session,
) -> Result<impl IntoResponse, RouteError> {
	sqlx::query("DELETE FROM session WHERE id = ?")
		.bind(session.id)
		.execute(&database)
		.await?;

	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		View::new(template::LOGGED_OUT, ()),
	))
}

/// Sign up
/// Registers a new account, returning an associated session cookie.
#[tracing::instrument(skip_all, fields(username = %auth.username))]
pub async fn signup(
	State(state): State<AppState>,
	Json(auth): Json<model::SignupInput>,
) -> Result<impl IntoResponse, RouteError> {
	let user_id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &auth.password, &user_id).map_err(Error::Argon)?;

	sqlx::query(
		r#"
			INSERT INTO "user" (id, email, username, password, created_at)
			VALUES (?, ?, ?, ?, ?)
		"#,
	)
	.bind(user_id)
	.bind(&auth.email)
	.bind(&auth.username)
	.bind(&hashed[..])
	.bind(Utc::now())
	.execute(&state.database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) if d.is_unique_violation() => {
			if d.message().contains("username") {
				Error::UsernameTaken.into()
			} else {
				Error::EmailTaken.into()
			}
		}
		e => RouteError::from(e),
	})?;

	let (session, cookie) = create_session(&state.database, user_id).await?;

	tracing::info!("user signed up");

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)))
}

/// Get user
/// Returns the authenticated user.
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}

/// Delete user
/// Deletes the authenticated user and their related content. This action is irreversible.
pub async fn delete_me(
	State(database): State<Database>,
	session: Session,
) -> Result<impl IntoResponse, RouteError> {
	sqlx::query(r#"DELETE FROM "user" WHERE id = ?"#)
		.bind(session.user.id)
		.execute(&database)
		.await?;

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		StatusCode::NO_CONTENT,
	))
}
