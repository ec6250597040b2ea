use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "clipvault=debug,tower_http=debug";

/// Install the global tracing subscriber: `RUST_LOG` filter (default
/// `clipvault=debug,tower_http=debug`) and a compact console format.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(console_fmt)
        .try_init()?;

    tracing::debug!("Tracing initialized");
    Ok(())
}
