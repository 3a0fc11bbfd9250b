use axum::extract::State;

use crate::{
	extract::{Path, Query},
	route::{post::model::PostFilter, template, View},
	Database,
};

use super::{
	model::{self, Group},
	Error, RouteError,
};

/// Group posts
/// Returns a group and a page of its posts, newest first.
pub async fn group_posts(
	State(database): State<Database>,
	Path(path): Path<model::SlugInput>,
	Query(query): Query<model::PageQuery>,
) -> Result<View<model::GroupContext>, RouteError> {
	let group = Group::by_slug(&database, &path.slug)
		.await?
		.ok_or_else(|| Error::UnknownGroup(path.slug.clone()))?;

	let page_obj = PostFilter::Group(group.id)
		.page(&database, query.page())
		.await?;

	Ok(View::new(
		template::GROUP_LIST,
		model::GroupContext { group, page_obj },
	))
}
