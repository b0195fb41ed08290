//! File logging with tracing
//!
//! The TUI owns stdout, so every event goes to a daily rolling file under
//! `~/.local/share/shlink-console/logs/`. The filter is read from
//! `SHLINK_CONSOLE_LOG`:
//!
//! ```bash
//! SHLINK_CONSOLE_LOG=debug shlink-console
//! SHLINK_CONSOLE_LOG=shlink_app=trace shlink-console
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

const LOG_ENV: &str = "SHLINK_CONSOLE_LOG";
const LOG_FILE_PREFIX: &str = "shlink-console.log";
const DEFAULT_FILTER: &str = "shlink_console=info,shlink_app=info,shlink_tui=info,warn";

/// Directory the log files are written to
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shlink-console")
        .join("logs")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to [`log_directory`]
pub fn init() -> Result<PathBuf> {
    let dir = log_directory();
    init_in(&dir)?;
    Ok(dir)
}

fn init_in(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);

    let file_layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()));

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .init();

    tracing::info!("Shlink Console {} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Logging to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_is_app_specific() {
        assert!(log_directory().ends_with("shlink-console/logs"));
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
