//! Configuration files for Shlink Console
//!
//! Supports:
//! - `config.toml` - User settings (theme, default ordering, endpoints)
//! - `servers.toml` - Registered Shlink servers

pub mod servers;
pub mod settings;
pub mod types;

pub use servers::{
    generate_server_id, servers_from_data, ServersRepository, TomlServersRepository,
};
pub use settings::{default_config_dir, load_settings, save_settings, system_preferred_theme};
pub use types::*;

#[cfg(test)]
pub use servers::MockServersRepository;
