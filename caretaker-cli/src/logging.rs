//! Logging initialization for the caretaker binary.
//!
//! Logs go to stderr; stdout carries only the report.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use caretaker_core::config::GeneralConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Level directive used when `RUST_LOG` is unset: `--log-level`, else `general.log_level`.
pub fn level_directive<'a>(config: &'a GeneralConfig, cli_level: Option<&'a str>) -> &'a str {
    cli_level.unwrap_or(&config.log_level)
}

/// Initialize the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, then `--log-level`, then `general.log_level`.
/// `general.log_format` selects JSON lines (`"json"`) or multi-line output (`"pretty"`).
pub fn init_tracing(config: &GeneralConfig, cli_level: Option<&str>) -> Result<()> {
    let format: BoxedLayer = match config.log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        "pretty" => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .boxed(),
        other => anyhow::bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level_directive(config, cli_level))?,
    };

    tracing_subscriber::registry()
        .with(format)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}
