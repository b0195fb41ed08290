//! Shlink Console - terminal administration for Shlink servers
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use shlink_console::app::config::default_config_dir;
use shlink_console::core::prelude::*;
use shlink_console::RunConfig;

/// Shlink Console - manage short URLs and tags of your Shlink servers
#[derive(Parser, Debug)]
#[command(name = "shlink-console", version)]
#[command(about = "A terminal administration console for Shlink servers", long_about = None)]
struct Args {
    /// Path to open at startup, e.g. /server/abc123/manage-tags
    #[arg(value_name = "PATH", default_value = "/")]
    path: String,

    /// Directory holding config.toml and servers.toml
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> RunConfig {
        RunConfig {
            config_dir: self.config_dir.unwrap_or_else(default_config_dir),
            initial_path: normalize_path(&self.path),
        }
    }
}

/// Paths are always absolute inside the console
fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config();
    shlink_console::run(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Args::parse_from(["shlink-console"]).into_config();
        assert_eq!(config.initial_path, "/");
        assert_eq!(config.config_dir, default_config_dir());
    }

    #[test]
    fn test_path_and_config_dir() {
        let config = Args::parse_from([
            "shlink-console",
            "--config-dir",
            "/tmp/shlink",
            "settings",
        ])
        .into_config();
        assert_eq!(config.initial_path, "/settings");
        assert_eq!(config.config_dir, PathBuf::from("/tmp/shlink"));
    }
}
