//! Path routing
//!
//! Maps a location path to the top-level view. When exactly one server is
//! registered the routing table collapses: `/` redirects to that server and the
//! server-management pages are not routable.

use shlink_core::{ServerId, ServersMap};

/// Top-level views
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Server list shown when zero or several servers are registered
    #[default]
    Home,
    /// Everything below `/server/:id/`
    Server { id: ServerId, section: ServerSection },
    Settings,
    ManageServers,
    CreateServer,
    EditServer(ServerId),
    NotFound,
}

impl Route {
    /// Server the route points at, if any
    pub fn server_id(&self) -> Option<&ServerId> {
        match self {
            Route::Server { id, .. } | Route::EditServer(id) => Some(id),
            _ => None,
        }
    }
}

/// Views nested under a server route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerSection {
    #[default]
    ShortUrls,
    CreateShortUrl,
    ManageTags,
}

impl ServerSection {
    /// Sections in tab order
    pub const ALL: [ServerSection; 3] = [
        ServerSection::ShortUrls,
        ServerSection::CreateShortUrl,
        ServerSection::ManageTags,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServerSection::ShortUrls => "List short URLs",
            ServerSection::CreateShortUrl => "Create short URL",
            ServerSection::ManageTags => "Manage tags",
        }
    }

    /// Section `delta` tabs away, wrapping around
    pub fn step(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let current = Self::ALL.iter().position(|s| *s == self).unwrap_or(0) as isize;
        Self::ALL[(current + delta).rem_euclid(len) as usize]
    }
}

/// Outcome of resolving a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    /// Replace the current location with another path
    Redirect(String),
}

pub fn server_path(id: &ServerId) -> String {
    format!("/server/{id}/")
}

pub fn server_section_path(id: &ServerId, section: ServerSection) -> String {
    match section {
        ServerSection::ShortUrls => format!("/server/{id}/list-short-urls/1"),
        ServerSection::CreateShortUrl => format!("/server/{id}/create-short-url"),
        ServerSection::ManageTags => format!("/server/{id}/manage-tags"),
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn server_section(rest: &[&str]) -> ServerSection {
    match rest.first() {
        Some(&"manage-tags") => ServerSection::ManageTags,
        Some(&"create-short-url") => ServerSection::CreateShortUrl,
        _ => ServerSection::ShortUrls,
    }
}

/// Resolve `path` against the registered servers
pub fn resolve_route(path: &str, servers: &ServersMap) -> Resolution {
    let parts = segments(path);

    if servers.len() == 1 {
        return resolve_single_server(&parts, servers);
    }

    let route = match parts.as_slice() {
        [] => Route::Home,
        ["settings", ..] => Route::Settings,
        ["manage-servers"] => Route::ManageServers,
        ["server", "create"] => Route::CreateServer,
        ["server", id, "edit"] => Route::EditServer(ServerId::new(*id)),
        ["server", id, rest @ ..] => Route::Server {
            id: ServerId::new(*id),
            section: server_section(rest),
        },
        _ => Route::NotFound,
    };
    Resolution::Render(route)
}

fn resolve_single_server(parts: &[&str], servers: &ServersMap) -> Resolution {
    let route = match parts {
        [] => {
            let first = servers.keys().next().map(server_path);
            return Resolution::Redirect(first.unwrap_or_else(|| "/server//".to_string()));
        }
        ["server", id, rest @ ..] => Route::Server {
            id: ServerId::new(*id),
            section: server_section(rest),
        },
        ["settings", ..] => Route::Settings,
        _ => Route::NotFound,
    };
    Resolution::Render(route)
}

/// Page number encoded in `/server/:id/list-short-urls/:page`
pub fn page_from_path(path: &str) -> Option<u32> {
    match segments(path).as_slice() {
        ["server", _, "list-short-urls", page, ..] => page.parse().ok().filter(|p| *p > 0),
        _ => None,
    }
}
