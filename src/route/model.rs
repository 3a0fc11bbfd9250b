use std::fmt;

use axum::response::{IntoResponse, Response};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A rendered page: the template to use and the context to render it with.
#[derive(Debug, Serialize)]
pub struct View<T> {
	pub template: &'static str,
	pub context: T,
}

impl<T> View<T> {
	pub fn new(template: &'static str, context: T) -> Self {
		Self { template, context }
	}
}

impl<T> IntoResponse for View<T>
where
	T: Serialize,
{
	fn into_response(self) -> Response {
		axum::Json(self).into_response()
	}
}

/// The `?page=` query parameter of paginated listings.
///
/// Kept as a string so that junk values fall back to the first page instead
/// of being rejected. A repeated `page` takes its last value, and any other
/// parameter is ignored.
#[derive(Validate)]
pub struct PageQuery {
	pub page: Option<String>,
}

impl<'de> Deserialize<'de> for PageQuery {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct PageVisitor;

		impl<'de> de::Visitor<'de> for PageVisitor {
			type Value = PageQuery;

			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("query parameters")
			}

			fn visit_map<A>(self, mut map: A) -> Result<PageQuery, A::Error>
			where
				A: de::MapAccess<'de>,
			{
				let mut page = None;

				while let Some((key, value)) = map.next_entry::<String, String>()? {
					if key == "page" {
						page = Some(value);
					}
				}

				Ok(PageQuery { page })
			}
		}

		deserializer.deserialize_map(PageVisitor)
	}
}

impl PageQuery {
	pub fn page(&self) -> Option<&str> {
		self.page.as_deref()
	}
}

#[derive(Deserialize, Validate)]
pub struct IdInput {
	pub id: i64,
}

/// Any slug is looked up, so one that is too long is simply not found.
#[derive(Deserialize, Validate)]
pub struct SlugInput {
	pub slug: String,
}

#[derive(Deserialize, Validate)]
pub struct UsernameInput {
	pub username: String,
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_view_shape() {
		let view = View::new("posts/index.html", serde_json::json!({ "count": 1 }));
		let value = serde_json::to_value(&view).unwrap();

		assert_eq!(value["template"], "posts/index.html");
		assert_eq!(value["context"]["count"], 1);
	}

	#[test]
	fn test_page_query_takes_last_page() {
		let query: PageQuery = serde_json::from_value(serde_json::json!({
			"page": "2",
			"q": "ignored",
		}))
		.unwrap();

		assert_eq!(query.page(), Some("2"));

		let query: PageQuery = serde_json::from_str(r#"{"page": "1", "page": "3"}"#).unwrap();

		assert_eq!(query.page(), Some("3"));

		let query: PageQuery = serde_json::from_str("{}").unwrap();

		assert_eq!(query.page(), None);
	}
}
