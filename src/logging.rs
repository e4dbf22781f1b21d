use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::TableError;

/// Logs go to a file, the terminal belongs to the ui. `RUST_LOG` wins over
/// the given default filter.
pub fn init(log_file: &Path, default_filter: &str) -> Result<(), TableError> {
    if let Some(parent) = log_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(log_file)?;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter));
    let env_filter = env_filter.map_err(|e| TableError::LoggingFailed(e.to_string()))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| TableError::LoggingFailed(e.to_string()))?;

    tracing::info!(log_file = %log_file.display(), "tracing initialized");
    Ok(())
}
