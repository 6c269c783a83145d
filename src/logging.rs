//! Structured logging setup using `tracing-subscriber` and `tracing-appender`.
//!
//! Two modes:
//! - **Production** ([`init_production`]): JSON file layer (daily rotation) + console layer
//! - **CLI** ([`init_cli`]): console-only for one-shot subcommands

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default directives for `start` when `RUST_LOG` is unset.
///
/// Message handling, fetches and replies from this crate at `debug`; the
/// HTTP client and Telegram dispatcher only report problems.
pub const PRODUCTION_FILTER: &str = "info,covidbot=debug,reqwest=warn,hyper=warn,teloxide=warn";

/// Default directives for one-shot subcommands when `RUST_LOG` is unset.
///
/// Degraded paths in this crate (listing or fetch failures) stay visible on
/// stderr; dependencies only report errors.
pub const CLI_FILTER: &str = "error,covidbot=warn";

/// Holds the non-blocking writer guard for file logging.
///
/// The [`WorkerGuard`] must be kept alive for the duration of the process.
/// Dropping it flushes pending log entries and closes the file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Initialise logging for the `start` subcommand.
///
/// Writes JSON logs to `{logs_dir}/covidbot.log.YYYY-MM-DD` with daily
/// rotation and human-readable output to stderr. Both are filtered by
/// `RUST_LOG` (default: [`PRODUCTION_FILTER`]).
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init_production(logs_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create logs directory {}: {e}",
            logs_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, "covidbot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = env_filter(PRODUCTION_FILTER);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(LoggingGuard { _guard: guard })
}

/// Initialise minimal logging for one-shot subcommands.
///
/// Emits human-readable output to stderr only, so stdout stays clean for
/// replies. Controlled by `RUST_LOG` (default: [`CLI_FILTER`]).
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(CLI_FILTER))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// `RUST_LOG` if set and valid, else `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
