//! Tracing subscriber setup.

use gridpart::config::LoggingSettings;
use tracing::debug;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `RUST_LOG` wins over the configured
/// level; `json_override` forces JSON lines. Logs go to stderr so stdout
/// only carries results.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub(crate) fn setup_logging(settings: &LoggingSettings, json_override: bool) -> Result<(), TryInitError> {
    let level = settings.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json_override || settings.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init()?;
    }

    debug!(level, "logging initialized");
    Ok(())
}
