pub use crate::route::model::{PageQuery, UsernameInput};

use serde::Serialize;

use crate::{
	pagination::Page,
	route::{auth::model::User, post::model::Post},
	Database,
};

impl User {
	pub async fn by_username(
		database: &Database,
		username: &str,
	) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(r#"SELECT * FROM "user" WHERE username = ?"#)
			.bind(username)
			.fetch_optional(database)
			.await
	}
}

#[derive(Serialize)]
pub struct ProfileContext {
	pub author: User,
	/// How many posts the author has written in total.
	pub count_posts: i64,
	/// Whether the viewer follows the author. Always false for anonymous viewers.
	pub following: bool,
	pub page_obj: Page<Post>,
}

#[derive(Serialize)]
pub struct FollowContext {
	pub page_obj: Page<Post>,
}
