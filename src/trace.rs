use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber.
///
/// Events at INFO and above are written to stdout, with colours.
/// HTTP requests are recorded by the `TraceLayer` installed in [`crate::router`].
pub fn init_tracing_subscriber() {
	tracing_subscriber::registry()
		.with(LevelFilter::from_level(Level::INFO))
		.with(tracing_subscriber::fmt::layer().with_ansi(true))
		.init();
}
