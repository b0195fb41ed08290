//! Configuration types for Shlink Console
//!
//! Defines:
//! - `Settings` - User preferences persisted in `config.toml`
//! - `Theme` - UI theme preference and its resolution
//! - `ServersFile` - On-disk layout of `servers.toml`

use serde::{Deserialize, Serialize};
use shlink_core::{Order, Server};
use url::Url;

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub short_urls_list: ShortUrlsListSettings,

    #[serde(default)]
    pub connection: ConnectionSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShortUrlsListSettings {
    /// Ordering applied when a server's list is first opened
    #[serde(default)]
    pub default_ordering: Order,

    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
}

impl Default for ShortUrlsListSettings {
    fn default() -> Self {
        Self {
            default_ordering: Order::default(),
            items_per_page: default_items_per_page(),
        }
    }
}

fn default_items_per_page() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Origin of the reverse proxy that serves `/oauth2/userinfo` and `/oauth2/sign_out`
    #[serde(default)]
    pub identity_base_url: Option<Url>,

    /// JSON list of servers fetched when no servers are registered locally
    #[serde(default)]
    pub servers_url: Option<Url>,

    /// JSON document `{ "version": "x.y.z" }` announcing the latest console release
    #[serde(default)]
    pub update_check_url: Option<Url>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            identity_base_url: None,
            servers_url: None,
            update_check_url: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl Theme {
    /// Next value when cycling from the settings view
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Auto,
            Theme::Auto => Theme::Light,
        }
    }

    /// Resolve `Auto` using the system preference
    pub fn resolve(self, system: ResolvedTheme) -> ResolvedTheme {
        match self {
            Theme::Light => ResolvedTheme::Light,
            Theme::Dark => ResolvedTheme::Dark,
            Theme::Auto => system,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::Auto => write!(f, "auto"),
        }
    }
}

/// Concrete theme applied to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedTheme {
    Light,
    #[default]
    Dark,
}

/// servers.toml layout
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServersFile {
    #[serde(default)]
    pub servers: Vec<Server>,
}
