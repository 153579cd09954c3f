use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use super::TracingConfig;

/// Installs the global subscriber. `RUST_LOG` overrides the configured
/// level. JSON output attaches the current `request` span to every event.
pub fn init_tracing(config: &TracingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    let output = if config.json_format {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer().compact().with_target(false).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(output)
        .init();

    tracing::info!(
        environment = %config.environment,
        level = %config.level,
        json_format = config.json_format,
        "Logging initialized"
    );
}
