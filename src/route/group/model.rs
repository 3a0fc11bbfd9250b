pub use crate::route::model::{PageQuery, SlugInput};

use serde::Serialize;

use crate::{pagination::Page, route::post::model::Post, Database};

/// A named category that posts can belong to.
///
/// Groups are managed outside of the application.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Group {
	pub id: i64,
	pub title: String,
	/// The unique, url-safe name of the group.
	pub slug: String,
	pub description: String,
}

impl Group {
	pub async fn by_slug(database: &Database, slug: &str) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(r#"SELECT * FROM "group" WHERE slug = ?"#)
			.bind(slug)
			.fetch_optional(database)
			.await
	}

	pub async fn all(database: &Database) -> Result<Vec<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(r#"SELECT * FROM "group" ORDER BY title"#)
			.fetch_all(database)
			.await
	}
}

#[derive(Serialize)]
pub struct GroupContext {
	pub group: Group,
	pub page_obj: Page<Post>,
}
