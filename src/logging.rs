use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `settings.level`. A `pretty` format gives
/// multi-line human output, anything else the compact default. Calling this
/// twice is harmless; the second call is ignored.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let result = if settings.format == "pretty" {
        subscriber.pretty().try_init()
    } else {
        subscriber.try_init()
    };

    if result.is_ok() {
        tracing::debug!("Logging initialised (level: {}, format: {})", settings.level, settings.format);
    }
}
