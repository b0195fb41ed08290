//! Application state (Model in TEA pattern)
//!
//! Every top-level slice lives behind an `Arc`. Handlers never mutate a slice
//! in place: [`mutate`] clones it, applies the change and installs a fresh
//! `Arc`, so subscribers detect changes by pointer comparison alone.

use std::sync::Arc;

use shlink_core::{
    supports_short_url_titles, Order, SelectedServer, ServerId, ServersMap, ShortUrlsList,
    TagsList,
};

use crate::config::{ResolvedTheme, Settings};
use crate::identity::IDENTITY_FALLBACK;
use crate::router::Route;
use crate::server_form::ServerFormState;
use crate::short_url_form::ShortUrlFormState;
use crate::tag_selector::TagsSelectorState;

/// Token identifying one mount of a component that owns async work
pub type MountId = u64;

/// Application lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Named slices of [`AppState`] a component can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Servers,
    SelectedServer,
    Settings,
    AppUpdated,
    TagsList,
    ShortUrlsList,
    Identity,
    Ui,
}

impl StateKey {
    pub const ALL: [StateKey; 8] = [
        StateKey::Servers,
        StateKey::SelectedServer,
        StateKey::Settings,
        StateKey::AppUpdated,
        StateKey::TagsList,
        StateKey::ShortUrlsList,
        StateKey::Identity,
        StateKey::Ui,
    ];
}

// ─────────────────────────────────────────────────────────────────────────────
// Slices
// ─────────────────────────────────────────────────────────────────────────────

/// New console release announced by the update check
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppUpdate {
    pub available: bool,
    pub latest_version: Option<String>,
}

/// Signed-in user as reported by the identity proxy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Loading,
    Email(String),
    /// Lookup failed or no identity layer is configured
    Unavailable,
}

impl Identity {
    /// Text shown in the header
    pub fn display(&self) -> &str {
        match self {
            Identity::Loading => "...",
            Identity::Email(email) => email,
            Identity::Unavailable => IDENTITY_FALLBACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityState {
    pub identity: Identity,
    /// Mount that owns the pending lookup. Results for any other mount are dropped.
    pub mount: Option<MountId>,
}

/// Query sent to the short URLs endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrlsListParams {
    pub page: u32,
    pub order: Order,
    pub tags: Vec<String>,
    pub search_term: Option<String>,
}

impl Default for ShortUrlsListParams {
    fn default() -> Self {
        Self {
            page: 1,
            order: Order::unordered(),
            tags: Vec::new(),
            search_term: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortUrlsListState {
    /// Server the list belongs to
    pub server_id: Option<ServerId>,
    pub params: ShortUrlsListParams,
    pub list: Option<ShortUrlsList>,
    pub loading: bool,
    pub error: Option<String>,
    /// Incremented per request. Only the response to the latest request is applied.
    pub request_seq: u64,
}

impl ShortUrlsListState {
    pub fn rows(&self) -> usize {
        self.list.as_ref().map(|l| l.data.len()).unwrap_or(0)
    }
}

/// Transient view state: location, cursors and open overlays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub location: String,
    pub route: Route,
    /// Selected row of the active list
    pub cursor: usize,
    /// Focused header column of the short URLs table
    pub column: usize,
    /// Highlighted entry while the servers dropdown is open
    pub servers_dropdown: Option<usize>,
    pub tags_selector: Option<TagsSelectorState>,
    pub server_form: Option<ServerFormState>,
    /// Present while the create short URL section is shown
    pub short_url_form: Option<ShortUrlFormState>,
    /// Typing goes to the tags search box
    pub search_focused: bool,
    pub notice: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            location: "/".to_string(),
            route: Route::Home,
            cursor: 0,
            column: 0,
            servers_dropdown: None,
            tags_selector: None,
            server_form: None,
            short_url_form: None,
            search_focused: false,
            notice: None,
        }
    }
}

/// Replace `slot` with a modified copy.
///
/// Always installs a new `Arc`, even when `f` changes nothing observable;
/// callers only invoke it for real mutations.
pub fn mutate<T: Clone>(slot: &mut Arc<T>, f: impl FnOnce(&mut T)) {
    let mut next = T::clone(slot);
    f(&mut next);
    *slot = Arc::new(next);
}

// ─────────────────────────────────────────────────────────────────────────────
// AppState
// ─────────────────────────────────────────────────────────────────────────────

/// Complete application state (the Model in TEA)
#[derive(Debug, Clone)]
pub struct AppState {
    pub servers: Arc<ServersMap>,
    pub selected_server: Arc<SelectedServer>,
    pub settings: Arc<Settings>,
    pub app_updated: Arc<AppUpdate>,
    pub tags_list: Arc<TagsList>,
    pub short_urls_list: Arc<ShortUrlsListState>,
    pub identity: Arc<IdentityState>,
    pub ui: Arc<UiState>,

    pub phase: AppPhase,
    /// Theme reported by the terminal, used when `ui.theme` is `auto`
    pub system_theme: ResolvedTheme,
    next_mount_id: MountId,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServersMap::new(), Settings::default())
    }
}

impl AppState {
    pub fn new(servers: ServersMap, settings: Settings) -> Self {
        Self {
            servers: Arc::new(servers),
            selected_server: Arc::new(SelectedServer::None),
            settings: Arc::new(settings),
            app_updated: Arc::new(AppUpdate::default()),
            tags_list: Arc::new(TagsList::default()),
            short_urls_list: Arc::new(ShortUrlsListState::default()),
            identity: Arc::new(IdentityState::default()),
            ui: Arc::new(UiState::default()),
            phase: AppPhase::Running,
            system_theme: ResolvedTheme::default(),
            next_mount_id: 1,
        }
    }

    pub fn with_system_theme(mut self, theme: ResolvedTheme) -> Self {
        self.system_theme = theme;
        self
    }

    /// Issue a fresh mount token
    pub fn next_mount(&mut self) -> MountId {
        let id = self.next_mount_id;
        self.next_mount_id += 1;
        id
    }

    /// Whether `key` points at a different slice than in `previous`
    pub fn slice_changed(&self, previous: &AppState, key: StateKey) -> bool {
        match key {
            StateKey::Servers => !Arc::ptr_eq(&self.servers, &previous.servers),
            StateKey::SelectedServer => {
                !Arc::ptr_eq(&self.selected_server, &previous.selected_server)
            }
            StateKey::Settings => !Arc::ptr_eq(&self.settings, &previous.settings),
            StateKey::AppUpdated => !Arc::ptr_eq(&self.app_updated, &previous.app_updated),
            StateKey::TagsList => !Arc::ptr_eq(&self.tags_list, &previous.tags_list),
            StateKey::ShortUrlsList => {
                !Arc::ptr_eq(&self.short_urls_list, &previous.short_urls_list)
            }
            StateKey::Identity => !Arc::ptr_eq(&self.identity, &previous.identity),
            StateKey::Ui => !Arc::ptr_eq(&self.ui, &previous.ui),
        }
    }

    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.settings.ui.theme.resolve(self.system_theme)
    }

    /// Whether the selected server can order and display titles
    pub fn supports_titles(&self) -> bool {
        supports_short_url_titles(self.selected_server.version())
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    /// Number of rows in the list shown by the active route
    pub fn visible_rows(&self) -> usize {
        match &self.ui.route {
            Route::Home | Route::ManageServers => self.servers.len(),
            Route::Server { section, .. } => match section {
                crate::router::ServerSection::ShortUrls => self.short_urls_list.rows(),
                crate::router::ServerSection::ManageTags => self.tags_list.filtered().len(),
                crate::router::ServerSection::CreateShortUrl => 0,
            },
            _ => 0,
        }
    }
}
