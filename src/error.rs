use std::{borrow::Cow, convert::Infallible};

use axum::{
	extract::rejection,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// Errors that can happen in any route, plus the route module's own error `T`.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T: ErrorShape> {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("serialization error: {0}")]
	Serialize(#[from] serde_json::Error),
	#[error(transparent)]
	Route(T),
}

/// The error type for extractors that have no route-specific failures.
pub type AppError = RouteError<Infallible>;

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn into_errors(self) -> Vec<Message>;

	/// When set, the client is sent here with `302 Found` instead of
	/// receiving an error body.
	fn redirect(&self) -> Option<String> {
		None
	}
}

impl ErrorShape for Infallible {
	fn status(&self) -> StatusCode {
		match *self {}
	}

	fn into_errors(self) -> Vec<Message> {
		match self {}
	}
}

/// A single client-facing error message.
#[derive(Debug, Serialize)]
pub struct Message {
	pub content: Cow<'static, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'static, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl Message {
	pub fn new(content: impl Into<Cow<'static, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub success: bool,
	pub errors: Vec<Message>,
}

/// Flattens validator errors into one message per failed rule.
fn validation_messages(errors: &validator::ValidationErrors) -> Vec<Message> {
	errors
		.field_errors()
		.into_iter()
		.flat_map(|(field, errors)| {
			let field = field.to_string();

			errors.iter().map(move |error| {
				let content = error
					.message
					.as_ref()
					.map_or_else(|| error.code.to_string(), ToString::to_string);

				Message::new(content).field(field.clone())
			})
		})
		.collect()
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response {
		let (status, errors) = match self {
			Self::Validation(ref errors) => (StatusCode::BAD_REQUEST, validation_messages(errors)),
			Self::Json(ref rejection) => (
				rejection.status(),
				Message::new(rejection.body_text()).into_vec(),
			),
			Self::Query(ref rejection) => (
				rejection.status(),
				Message::new(rejection.body_text()).into_vec(),
			),
			// Path parameters are part of the route, so a bad one is a missing page.
			Self::Path(..) => (StatusCode::NOT_FOUND, Message::new("not_found").into_vec()),
			Self::Database(ref error) => {
				tracing::error!(%error, "database error");

				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Message::new("internal_error").into_vec(),
				)
			}
			Self::Serialize(ref error) => {
				tracing::error!(%error, "serialization error");

				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Message::new("internal_error").into_vec(),
				)
			}
			Self::Route(error) => {
				if let Some(location) = error.redirect() {
					return crate::route::found(&location);
				}

				(error.status(), error.into_errors())
			}
		};

		(
			status,
			Json(ErrorResponse {
				success: false,
				errors,
			}),
		)
			.into_response()
	}
}
