//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never mix with tables printed on stdout.
//! `ADCTL_LOG` takes an `EnvFilter` directive; without it the level is
//! `warn`, or `debug` with `--verbose`. `ADCTL_LOG_FORMAT=json` switches
//! stderr output to JSON lines. When a log directory is configured a daily
//! rolling file is written as well.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "ADCTL_LOG";
pub const LOG_FORMAT_ENV: &str = "ADCTL_LOG_FORMAT";
const LOG_FILE_PREFIX: &str = "adctl.log";

/// Filter used when `ADCTL_LOG` is unset or unparsable.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "adctl=debug,info" } else { "warn" }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. The returned guard flushes the file
/// writer on drop and must be held for the life of the process.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(file_layer);

    let installed = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose),
            )
            .try_init()
    };
    // A subscriber already set (tests, embedding) is not an error.
    if installed.is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }

    Ok(guard)
}
