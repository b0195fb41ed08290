//! Message types for the application (TEA pattern)
//!
//! Every state change goes through one of these messages. Components send
//! them through their bound actions, background tasks send the `*Loaded` /
//! `*Failed` variants back when their request completes.

use shlink_core::{
    Order, OrderableField, ServerData, ServerId, ServersMap, ShortUrl, ShortUrlsList, TagsList,
};

use crate::config::Settings;
use crate::server_form::ServerFormState;
use crate::short_url_form::ShortUrlFormState;
use crate::state::{Identity, MountId};
use crate::tag_selector::TagsSelectorTarget;

/// Outcome of probing a server's health endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthOutcome {
    Reachable { version: String },
    NotReachable { error: String },
}

/// All possible messages in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Periodic tick from the event loop
    Tick,

    /// Terminal resized
    Resize,

    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Go to a path (redirects are followed)
    Navigate(String),
    /// Move the selection of the active list
    MoveCursor(isize),
    /// Move the focused column of the short URLs table
    MoveColumn(isize),
    ToggleServersDropdown,
    MoveServersDropdown(isize),
    DismissNotice,

    // ─────────────────────────────────────────────────────────
    // Servers
    // ─────────────────────────────────────────────────────────
    /// Load servers from the remote `servers_url`
    FetchServers,
    RemoteServersLoaded(ServersMap),
    RemoteServersFailed(String),

    SelectServer(ServerId),
    ServerHealthChecked {
        server_id: ServerId,
        outcome: HealthOutcome,
    },

    OpenCreateServer,
    OpenEditServer(ServerId),
    ServerFormChanged(ServerFormState),
    SubmitServerForm,
    CreateServer(ServerData),
    EditServer {
        id: ServerId,
        data: ServerData,
    },
    DeleteServer(ServerId),

    // ─────────────────────────────────────────────────────────
    // Short URLs
    // ─────────────────────────────────────────────────────────
    ListShortUrls,
    OrderByColumn(OrderableField),
    ChangePage(u32),
    /// New tag filter emitted by the tags selector
    TagsFilterChanged(Vec<String>),
    ShortUrlsLoaded {
        server_id: ServerId,
        seq: u64,
        list: ShortUrlsList,
    },
    ShortUrlsFailed {
        server_id: ServerId,
        seq: u64,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Create short URL
    // ─────────────────────────────────────────────────────────
    ShortUrlFormChanged(ShortUrlFormState),
    /// New tags emitted by the tags selector for the form
    ShortUrlTagsChanged(Vec<String>),
    SubmitShortUrlForm,
    ShortUrlCreated {
        server_id: ServerId,
        short_url: ShortUrl,
    },
    ShortUrlCreationFailed {
        server_id: ServerId,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Tags
    // ─────────────────────────────────────────────────────────
    ListTags,
    /// Tags selector mounted: load suggestions on behalf of its token
    ListSelectorTags(MountId),
    /// `mount` is set when the request belongs to a tags selector
    TagsLoaded {
        server_id: ServerId,
        mount: Option<MountId>,
        tags: TagsList,
    },
    TagsFailed {
        server_id: ServerId,
        mount: Option<MountId>,
        error: String,
    },
    SetTagsSearch(String),
    FocusTagsSearch(bool),

    OpenTagsSelector(TagsSelectorTarget),
    CloseTagsSelector,
    /// Tags selector unmounted: drop its pending request
    ReleaseTagsSelector(MountId),
    /// Replace the text typed in the selector
    EditTagsInput(String),
    MoveTagsSuggestion(isize),

    // ─────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────
    /// Header mounted: start a lookup owned by a fresh mount token
    FetchIdentity,
    IdentityLoaded {
        mount: MountId,
        identity: Identity,
    },
    /// Header unmounted: drop any pending lookup
    ReleaseIdentity,
    SignOut,

    // ─────────────────────────────────────────────────────────
    // Settings & updates
    // ─────────────────────────────────────────────────────────
    CycleTheme,
    SetDefaultOrdering(Order),
    AppUpdateAvailable {
        version: String,
    },
    ResetAppUpdate,
    ForceUpdate,
    /// Servers and settings re-read from disk
    Reloaded {
        servers: ServersMap,
        settings: Settings,
    },
}
