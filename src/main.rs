#![warn(clippy::pedantic)]

mod cache;
mod config;
mod error;
mod extract;
mod form;
mod pagination;
mod route;
mod session;
mod trace;

#[cfg(test)]
mod test;

use argon2::Argon2;
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{cache::PageCache, config::Config};

pub type Database = sqlx::Pool<sqlx::Sqlite>;
pub type AppState = State;

/// The shared application state.
///
/// Everything in here is cheap to clone: the pool and the cache are
/// reference-counted handles.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub cache: PageCache,
}

impl State {
	pub fn new(database: Database, config: &Config) -> Self {
		Self {
			database,
			hasher: Argon2::default(),
			cache: PageCache::new(config.index_cache_ttl),
		}
	}
}

/// Builds the full application router, including middleware.
pub fn router(state: State) -> Router {
	Router::new()
		.merge(route::routes())
		.nest("/auth", route::auth::routes())
		.fallback(route::not_found)
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	trace::init_tracing_subscriber();
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");

	let database = SqlitePoolOptions::new()
		.connect_with(config.connect_options().expect("DATABASE_URL must be a sqlite url"))
		.await
		.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let app = router(State::new(database, &config));

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(listener, app).await.unwrap();
}
