use crate::settings::LoggingSettings;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `settings.filter`. Returns `false` when a
/// subscriber was already installed, which leaves the existing one in place.
pub fn init_logging(settings: &LoggingSettings) -> bool {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&settings.filter))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_target(true)
				.with_ansi(settings.ansi),
		)
		.try_init()
		.is_ok()
}
