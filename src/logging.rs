//! Console and rotating file logging.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_PREFIX: &str = "attendance-scanner";

/// Installs the global subscriber: coloured console output plus a daily log
/// file under `<data_dir>/logs`, keeping a week of files.
pub fn setup_logging(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir)?;

    let console_layer = fmt::layer().with_target(true).with_ansi(true);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(7)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(&logs_dir)?;

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
