//! Tracing subscriber setup

use folio_core::core::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match logging.format.to_ascii_lowercase().as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}
