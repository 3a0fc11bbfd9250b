use axum::{http::StatusCode, routing::get, Router};

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown group {0}")]
	UnknownGroup(String),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> Router<AppState> {
	Router::new().route("/group/:slug/", get(route::group_posts))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownGroup(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message> {
		let Self::UnknownGroup(slug) = self;

		error::Message::new("unknown_group")
			.detail("group", slug)
			.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_group_lists_only_its_posts(pool: Database) {
		let author = app(pool.clone());
		let user = signup(&author, "auth").await;
		let group = create_group(&pool, "test_url").await;
		let other = create_group(&pool, "other").await;

		create_post(&pool, user, "In the group", Some(group)).await;
		create_post(&pool, user, "In another group", Some(other)).await;
		create_post(&pool, user, "In no group", None).await;

		let response = author.get("/group/test_url/").await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<Value>();
		let context = &body["context"];

		assert_eq!(context["group"]["slug"], "test_url");
		assert_eq!(context["group"]["description"], "Test description");
		assert_eq!(context["page_obj"]["count"], 1);
		assert_eq!(context["page_obj"]["items"][0]["text"], "In the group");
		assert_eq!(context["page_obj"]["items"][0]["group_slug"], "test_url");
	}

	#[sqlx::test]
	async fn test_unknown_group(pool: Database) {
		let app = app(pool);

		let response = app.get("/group/missing/").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(response.json::<Value>()["errors"][0]["content"], "unknown_group");
	}

	#[sqlx::test]
	async fn test_long_slug_is_not_found(pool: Database) {
		let app = app(pool);

		let response = app.get(&format!("/group/{}/", "a".repeat(51))).await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(response.json::<Value>()["errors"][0]["content"], "unknown_group");
	}

	#[sqlx::test]
	async fn test_deleting_group_keeps_posts(pool: Database) {
		let author = app(pool.clone());
		let user = signup(&author, "auth").await;
		let group = create_group(&pool, "test_url").await;
		let post = create_post(&pool, user, "Outlives its group", Some(group)).await;

		sqlx::query(r#"DELETE FROM "group" WHERE id = ?"#)
			.bind(group)
			.execute(&pool)
			.await
			.unwrap();

		let response = author.get(&format!("/posts/{post}/")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["context"]["post"]["group_id"], Value::Null);
	}
}
