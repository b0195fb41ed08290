//! Shlink Console Library
//!
//! A terminal administration console for Shlink URL shortener servers.

pub use shlink_app as app;
pub use shlink_core as core;
pub use shlink_tui as tui;

pub use shlink_tui::RunConfig;

use shlink_core::prelude::*;

/// Run the console with `config`
///
/// Installs error reporting and file logging, then hands the terminal to
/// the TUI until the user quits.
pub async fn run(config: RunConfig) -> Result<()> {
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Logs go to a file, the TUI owns stdout
    shlink_core::logging::init()?;

    info!("Config directory: {}", config.config_dir.display());
    info!("Initial path: {}", config.initial_path);

    let result = shlink_tui::run(config).await;
    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }
    result
}
