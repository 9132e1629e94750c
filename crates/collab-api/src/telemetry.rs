//! Tracing subscriber setup: JSON to the console, plain text to the log file.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Settings;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` or `info`
/// depending on `settings.debug`. If the log file cannot be opened the
/// server keeps logging to the console only.
pub fn init_tracing(settings: &Settings) {
    let default_level = if settings.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, file_error) = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_path)
    {
        Ok(file) => (
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            None,
        ),
        Err(err) => (None, Some(err)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .with(file_layer)
        .init();

    if let Some(err) = file_error {
        warn!(
            path = %settings.log_path.display(),
            error = %err,
            "log file unavailable, logging to console only"
        );
    }
}
