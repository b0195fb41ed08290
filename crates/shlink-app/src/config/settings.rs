//! Settings parser for config.toml and theme detection

use super::types::{ResolvedTheme, Settings};
use shlink_core::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "shlink-console";

/// Default configuration directory (`~/.config/shlink-console`)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Load settings from `config_dir/config.toml`, falling back to defaults
pub fn load_settings(config_dir: &Path) -> Settings {
    let config_path = config_dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Save settings to `config_dir/config.toml` (atomic write)
pub fn save_settings(config_dir: &Path, settings: &Settings) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    let temp_path = config_dir.join(".config.toml.tmp");

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("{}{}", generate_config_header(), content);

    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;

    std::fs::rename(&temp_path, &config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

fn generate_config_header() -> String {
    "# Shlink Console Configuration\n\
     # Edited from the Settings view; manual changes are preserved on load.\n\n"
        .to_string()
}

/// Detect whether the terminal background is light or dark.
///
/// Uses `COLORFGBG` (`"fg;bg"`, set by rxvt, Konsole, iTerm2 and others);
/// background colors 7 and 9-15 are light. Defaults to dark.
pub fn system_preferred_theme() -> ResolvedTheme {
    std::env::var("COLORFGBG")
        .ok()
        .map(|value| theme_from_colorfgbg(&value))
        .unwrap_or_default()
}

fn theme_from_colorfgbg(value: &str) -> ResolvedTheme {
    let bg = value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match bg {
        Some(7) | Some(9..=15) => ResolvedTheme::Light,
        _ => ResolvedTheme::Dark,
    }
}
