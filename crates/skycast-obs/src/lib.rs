use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Filter used when RUST_LOG is unset
pub const DEFAULT_FILTER: &str = "info,skycast=debug";

/// Build the log filter from RUST_LOG, falling back to [`DEFAULT_FILTER`]
/// when the variable is unset or does not parse
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber: JSON lines on stdout, filtered by
/// [`env_filter`]. Fails if a subscriber is already set.
pub fn try_init(service_name: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
        .try_init()?;

    tracing::info!(service = %service_name, version = env!("CARGO_PKG_VERSION"), "observability initialized");
    Ok(())
}

/// Like [`try_init`], but a second call is a no-op
pub fn init(service_name: &str) {
    if let Err(e) = try_init(service_name) {
        tracing::debug!(error = %e, "subscriber already installed");
    }
}
