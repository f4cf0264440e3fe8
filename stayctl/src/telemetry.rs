//! Telemetry initialization: structured logging via `tracing`.
//!
//! The log level is controlled by `RUST_LOG` (standard `EnvFilter` syntax),
//! defaulting to `info`. Repository methods are instrumented with
//! abbreviated entity IDs so a booking's path through the engine can be
//! followed without leaking whole UUIDs into every line.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber with console output and an env filter.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .try_init()?;

    Ok(())
}
