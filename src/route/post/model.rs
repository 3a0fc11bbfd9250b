pub use crate::route::model::{IdInput, PageQuery};

use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::{
	form::{Bound, CommentForm, PostForm},
	pagination::{Page, Paginator, PAGE_SIZE},
	route::group::model::Group,
	Database,
};

/// The number of characters of a post used as its title.
pub const TITLE_LENGTH: usize = 15;

/// Columns selected for a [`Post`], joined with its author and group.
const POST_COLUMNS: &str = r#"
	SELECT
		post.id, post.text, post.pub_date, post.author_id,
		"user".username AS author,
		post.group_id, "group".slug AS group_slug,
		post.image
	FROM post
	JOIN "user" ON "user".id = post.author_id
	LEFT JOIN "group" ON "group".id = post.group_id
"#;

/// A single post, created by a user.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	pub id: i64,
	/// The content of the post.
	pub text: String,
	/// The publication time of the post. Never changes after creation.
	pub pub_date: chrono::DateTime<chrono::Utc>,
	/// The user that wrote the post.
	pub author_id: Uuid,
	/// The username of the author.
	pub author: String,
	/// The group the post belongs to.
	pub group_id: Option<i64>,
	/// The slug of the group the post belongs to.
	pub group_slug: Option<String>,
	/// A stored image attached to the post.
	pub image: Option<String>,
}

impl Post {
	/// The first few characters of the text, used wherever a post needs a title.
	pub fn title(&self) -> String {
		self.text.chars().take(TITLE_LENGTH).collect()
	}

	pub async fn find(database: &Database, id: i64) -> Result<Option<Self>, sqlx::Error> {
		QueryBuilder::<Sqlite>::new(POST_COLUMNS)
			.push(" WHERE post.id = ")
			.push_bind(id)
			.build_query_as::<Self>()
			.fetch_optional(database)
			.await
	}
}

/// A comment left on a post.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Comment {
	pub id: i64,
	pub post_id: i64,
	pub author_id: Uuid,
	/// The username of the author.
	pub author: String,
	pub text: String,
	pub created: chrono::DateTime<chrono::Utc>,
}

impl Comment {
	/// Every comment on a post, newest first.
	pub async fn for_post(database: &Database, post_id: i64) -> Result<Vec<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(
			r#"
				SELECT
					comment.id, comment.post_id, comment.author_id,
					"user".username AS author,
					comment.text, comment.created
				FROM comment
				JOIN "user" ON "user".id = comment.author_id
				WHERE comment.post_id = ?
				ORDER BY comment.created DESC, comment.id DESC
			"#,
		)
		.bind(post_id)
		.fetch_all(database)
		.await
	}
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy)]
pub enum PostFilter {
	All,
	Group(i64),
	Author(Uuid),
	/// Posts by every author the given user follows.
	FollowedBy(Uuid),
}

impl PostFilter {
	fn push_where(self, query: &mut QueryBuilder<'_, Sqlite>) {
		match self {
			Self::All => {}
			Self::Group(group) => {
				query.push(" WHERE post.group_id = ").push_bind(group);
			}
			Self::Author(author) => {
				query.push(" WHERE post.author_id = ").push_bind(author);
			}
			Self::FollowedBy(user) => {
				query
					.push(" WHERE post.author_id IN (SELECT author_id FROM follow WHERE user_id = ")
					.push_bind(user)
					.push(")");
			}
		}
	}

	/// Fetches the requested page of matching posts, newest first.
	pub async fn page(
		self,
		database: &Database,
		requested: Option<&str>,
	) -> Result<Page<Post>, sqlx::Error> {
		let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM post");
		self.push_where(&mut count);

		let count = count
			.build_query_scalar::<i64>()
			.fetch_one(database)
			.await?;

		let window = Paginator::new(count, PAGE_SIZE).locate(requested);

		let mut query = QueryBuilder::<Sqlite>::new(POST_COLUMNS);
		self.push_where(&mut query);
		query
			.push(" ORDER BY post.pub_date DESC, post.id DESC LIMIT ")
			.push_bind(window.limit())
			.push(" OFFSET ")
			.push_bind(window.offset());

		let posts = query.build_query_as::<Post>().fetch_all(database).await?;

		Ok(window.into_page(posts))
	}
}

#[derive(Serialize)]
pub struct IndexContext {
	pub page_obj: Page<Post>,
}

#[derive(Serialize)]
pub struct PostDetailContext {
	pub post_title: String,
	/// How many posts the author has written in total.
	pub posts_count: i64,
	pub post: Post,
	pub comments: Vec<Comment>,
	pub form: Bound<CommentForm>,
}

#[derive(Serialize)]
pub struct PostFormContext {
	pub form: Bound<PostForm>,
	/// The groups a post can be assigned to.
	pub groups: Vec<Group>,
	pub is_edit: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub post: Option<Post>,
}
