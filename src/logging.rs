//! Structured logging bootstrap using `tracing`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::DriverError;

/// Install a global tracing subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Returns early
/// if a subscriber is already installed.
pub fn init_tracing() -> Result<(), DriverError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| DriverError::Logging(err.to_string()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(false)
        .with_level(true)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .map_err(|err| DriverError::Logging(err.to_string()))
}
