//! Tracing subscriber setup.

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    #[display("pretty")]
    Pretty,
    /// One JSON object per line
    #[display("json")]
    Json,
}

/// Install a global subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG`, falling back to `info`.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    info!(format = %format, "Tracing initialized");
    Ok(())
}
