pub use axum::http::StatusCode;
pub use axum_test::{TestServer, TestServerConfig};
pub use serde_json::{json, Value};
pub use uuid::Uuid;

pub use crate::{config::Config, router, Database, State};

pub const PASSWORD: &str = "hunter2hunter";

/// A test server over the full router, keeping cookies between requests.
pub fn server(state: State) -> TestServer {
	TestServer::new_with_config(
		router(state),
		TestServerConfig {
			save_cookies: true,
			..TestServerConfig::default()
		},
	)
	.unwrap()
}

pub fn app(pool: Database) -> TestServer {
	server(State::new(pool, &Config::default()))
}

/// Signs up `username` on the server, leaving it logged in, and returns the new user's id.
pub async fn signup(server: &TestServer, username: &str) -> Uuid {
	let response = server
		.post("/auth/signup/")
		.json(&json!({
			"email": format!("{username}@example.com"),
			"username": username,
			"password": PASSWORD,
		}))
		.await;

	assert_eq!(response.status_code(), 200);

	let me = server.get("/auth/me/").await.json::<Value>();

	me["id"].as_str().unwrap().parse().unwrap()
}

pub async fn create_group(pool: &Database, slug: &str) -> i64 {
	sqlx::query(r#"INSERT INTO "group" (title, slug, description) VALUES (?, ?, ?)"#)
		.bind("Test group")
		.bind(slug)
		.bind("Test description")
		.execute(pool)
		.await
		.unwrap()
		.last_insert_rowid()
}

pub async fn create_post(pool: &Database, author: Uuid, text: &str, group: Option<i64>) -> i64 {
	sqlx::query("INSERT INTO post (text, pub_date, author_id, group_id) VALUES (?, ?, ?, ?)")
		.bind(text)
		.bind(chrono::Utc::now())
		.bind(author)
		.bind(group)
		.execute(pool)
		.await
		.unwrap()
		.last_insert_rowid()
}

pub async fn count(pool: &Database, table: &str) -> i64 {
	sqlx::query_scalar(&format!(r#"SELECT COUNT(*) FROM "{table}""#))
		.fetch_one(pool)
		.await
		.unwrap()
}
