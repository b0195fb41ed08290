//! Persisted server list (servers.toml)

use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::Rng;

use super::types::ServersFile;
use shlink_core::prelude::*;
use shlink_core::{ServerData, ServerId, ServersMap};

const SERVERS_FILENAME: &str = "servers.toml";
const SERVER_ID_LEN: usize = 12;

/// Storage for the locally registered servers
#[cfg_attr(test, mockall::automock)]
pub trait ServersRepository: Send + Sync {
    fn load(&self) -> Result<ServersMap>;
    fn save(&self, servers: &ServersMap) -> Result<()>;
}

/// `servers.toml` in the configuration directory
#[derive(Debug, Clone)]
pub struct TomlServersRepository {
    dir: PathBuf,
}

impl TomlServersRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SERVERS_FILENAME)
    }
}

impl ServersRepository for TomlServersRepository {
    fn load(&self) -> Result<ServersMap> {
        let path = self.path();
        if !path.exists() {
            debug!("No servers file at {:?}", path);
            return Ok(ServersMap::new());
        }

        let content = std::fs::read_to_string(&path)?;
        let file: ServersFile = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {:?}: {}", path, e)))?;

        Ok(file
            .servers
            .into_iter()
            .map(|server| (server.id.clone(), server))
            .collect())
    }

    fn save(&self, servers: &ServersMap) -> Result<()> {
        write_servers(&self.dir, servers)
    }
}

fn write_servers(dir: &Path, servers: &ServersMap) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;

    let file = ServersFile {
        servers: servers.values().cloned().collect(),
    };
    let content = toml::to_string_pretty(&file)
        .map_err(|e| Error::config(format!("Failed to serialize servers: {}", e)))?;

    let temp_path = dir.join(".servers.toml.tmp");
    std::fs::write(&temp_path, content).context("Writing servers")?;
    std::fs::rename(&temp_path, dir.join(SERVERS_FILENAME)).context("Replacing servers.toml")?;

    info!("Saved {} server(s)", servers.len());
    Ok(())
}

/// Random id for a newly registered server
pub fn generate_server_id() -> ServerId {
    let id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SERVER_ID_LEN)
        .map(char::from)
        .collect();
    ServerId::new(id.to_lowercase())
}

/// Turn remotely fetched server data into registered servers, skipping invalid entries
pub fn servers_from_data(data: Vec<ServerData>) -> ServersMap {
    data.into_iter()
        .filter_map(|entry| {
            let name = entry.name.clone();
            match entry.into_server(generate_server_id()) {
                Ok(server) => Some((server.id.clone(), server)),
                Err(e) => {
                    warn!("Skipping remote server '{}': {}", name, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shlink_core::Server;
    use tempfile::tempdir;

    fn server(id: &str) -> Server {
        Server::new(id.into(), format!("Server {id}"), "https://s.test", "key").unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = tempdir().unwrap();
        let repo = TomlServersRepository::new(temp.path());
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().unwrap();
        let repo = TomlServersRepository::new(temp.path());

        let mut servers = ServersMap::new();
        servers.insert("a".into(), server("a"));
        servers.insert("b".into(), server("b"));
        repo.save(&servers).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&ServerId::new("a")].name, "Server a");
        assert_eq!(loaded[&ServerId::new("b")].api_key, "key");
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("servers.toml"), "[[servers]]\nid = 3").unwrap();
        let repo = TomlServersRepository::new(temp.path());
        assert!(repo.load().is_err());
    }

    #[test]
    fn test_generate_server_id_is_unique_enough() {
        let a = generate_server_id();
        let b = generate_server_id();
        assert_eq!(a.as_str().len(), SERVER_ID_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_servers_from_data_skips_invalid() {
        let data = vec![
            ServerData {
                name: "ok".to_string(),
                url: "https://ok.test".to_string(),
                api_key: "k".to_string(),
            },
            ServerData {
                name: "broken".to_string(),
                url: "nope".to_string(),
                api_key: "k".to_string(),
            },
        ];
        let servers = servers_from_data(data);
        assert_eq!(servers.len(), 1);
        assert_eq!(servers.values().next().unwrap().name, "ok");
    }
}
