//! Shlink server domain types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Identifier of a registered server
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Whether the console could contact a server's API at last check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    /// Not checked yet in this session
    #[default]
    Unchecked,
    Reachable,
    NotFound,
    NotReachable,
}

impl Reachability {
    pub fn label(&self) -> &'static str {
        match self {
            Reachability::Unchecked => "unchecked",
            Reachability::Reachable => "reachable",
            Reachability::NotFound => "not found",
            Reachability::NotReachable => "not reachable",
        }
    }
}

/// A configured Shlink instance the console can manage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: ServerId,
    pub name: String,
    pub url: Url,
    pub api_key: String,

    /// Version reported by the server health endpoint
    #[serde(default, skip_serializing)]
    pub version: Option<String>,

    #[serde(default, skip_serializing)]
    pub reachability: Reachability,
}

impl Server {
    /// Build a server after validating user-provided fields
    pub fn new(
        id: ServerId,
        name: impl Into<String>,
        url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let data = ServerData {
            name: name.into(),
            url: url.to_string(),
            api_key: api_key.into(),
        };
        data.into_server(id)
    }

    /// Base URL without trailing slash, used to build API paths
    pub fn base_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }
}

/// Server fields as typed in a form or read from a remote `servers.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerData {
    pub name: String,
    pub url: String,
    pub api_key: String,
}

impl ServerData {
    pub fn validate(&self) -> Result<Url> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_server("name is required"));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::invalid_server("API key is required"));
        }
        let url = Url::parse(self.url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_server(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    pub fn into_server(self, id: ServerId) -> Result<Server> {
        let url = self.validate()?;
        Ok(Server {
            id,
            name: self.name.trim().to_string(),
            url,
            api_key: self.api_key.trim().to_string(),
            version: None,
            reachability: Reachability::Unchecked,
        })
    }
}

/// All registered servers keyed by id
pub type ServersMap = BTreeMap<ServerId, Server>;

/// The server the active route points at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectedServer {
    #[default]
    None,
    /// Health check in flight
    Checking(ServerId),
    Reachable {
        server: Server,
        version: String,
        printable_version: String,
    },
    NotFound(ServerId),
    NotReachable(Server),
}

impl SelectedServer {
    pub fn id(&self) -> Option<&ServerId> {
        match self {
            SelectedServer::None => None,
            SelectedServer::Checking(id) | SelectedServer::NotFound(id) => Some(id),
            SelectedServer::Reachable { server, .. } | SelectedServer::NotReachable(server) => {
                Some(&server.id)
            }
        }
    }

    pub fn reachable_server(&self) -> Option<&Server> {
        match self {
            SelectedServer::Reachable { server, .. } => Some(server),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            SelectedServer::Reachable { version, .. } => Some(version),
            _ => None,
        }
    }
}
