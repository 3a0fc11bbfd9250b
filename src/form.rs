//! Validation of the post and comment forms.
//!
//! Unlike the JSON inputs validated by [`crate::extract::Json`], these forms are
//! shown back to the user on failure, so their errors are collected per field
//! next to the submitted values instead of being turned into an error response.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::Database;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";

/// Field name to the messages of every rule it failed.
pub type FormErrors = BTreeMap<String, Vec<String>>;

/// Rejects text that is empty once surrounding whitespace is removed.
pub fn validate_not_blank(text: &str) -> Result<(), ValidationError> {
	if text.trim().is_empty() {
		let mut error = ValidationError::new("required");
		error.message = Some(REQUIRED.into());

		return Err(error);
	}

	Ok(())
}

/// Strips surrounding whitespace from submitted text, before it is validated or saved.
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	String::deserialize(deserializer).map(|text| text.trim().to_string())
}

/// Collects validator errors into per-field messages.
fn collect(errors: &validator::ValidationErrors) -> FormErrors {
	errors
		.field_errors()
		.into_iter()
		.map(|(field, errors)| {
			let messages = errors
				.iter()
				.map(|error| {
					error
						.message
						.as_ref()
						.map_or_else(|| error.code.to_string(), ToString::to_string)
				})
				.collect();

			(field.to_string(), messages)
		})
		.collect()
}

/// The form used to create and edit posts.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct PostForm {
	/// The body of the post.
	#[serde(default, deserialize_with = "trimmed")]
	#[validate(custom(function = "validate_not_blank"))]
	pub text: String,
	/// The id of the group the post belongs to, if any.
	#[serde(default)]
	pub group: Option<i64>,
	/// A stored image, as a path relative to the media root.
	#[serde(default)]
	#[validate(length(max = 100))]
	pub image: Option<String>,
}

impl PostForm {
	/// Checks every field, including that the chosen group exists.
	pub async fn clean(&self, database: &Database) -> Result<FormErrors, sqlx::Error> {
		let mut errors = self.validate().map_or_else(|e| collect(&e), |()| FormErrors::new());

		if let Some(group) = self.group {
			let exists =
				sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "group" WHERE id = ?"#)
					.bind(group)
					.fetch_one(database)
					.await?;

			if exists == 0 {
				errors
					.entry("group".into())
					.or_default()
					.push(INVALID_CHOICE.into());
			}
		}

		Ok(errors)
	}
}

/// The form used to comment on a post.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct CommentForm {
	#[serde(default, deserialize_with = "trimmed")]
	#[validate(custom(function = "validate_not_blank"))]
	pub text: String,
}

impl CommentForm {
	pub fn clean(&self) -> FormErrors {
		self.validate().map_or_else(|e| collect(&e), |()| FormErrors::new())
	}
}

/// A form as shown to the user: the submitted values and what is wrong with them.
#[derive(Debug, Serialize)]
pub struct Bound<F> {
	#[serde(flatten)]
	pub values: F,
	pub errors: FormErrors,
}

impl<F> Bound<F> {
	pub fn new(values: F, errors: FormErrors) -> Self {
		Self { values, errors }
	}

	pub fn unbound(values: F) -> Self {
		Self::new(values, FormErrors::new())
	}
}
