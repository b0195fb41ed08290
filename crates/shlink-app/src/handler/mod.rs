//! Handler module - TEA update function and message handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `navigation`: Location changes, cursors and overlays
//! - `servers`: Server registry, selection and the server form
//! - `short_urls`: Short URLs list requests, ordering and paging
//! - `create_short_url`: Create short URL form and submission
//! - `tags`: Tags list and the tags selector
//! - `identity`: Header identity lookup and sign out
//! - `settings`: Settings and app update handling

pub(crate) mod create_short_url;
pub(crate) mod identity;
pub(crate) mod navigation;
pub(crate) mod servers;
pub(crate) mod settings;
pub(crate) mod short_urls;
pub(crate) mod tags;
pub(crate) mod update;


use shlink_core::{Server, ServersMap, ShortUrlData};
use url::Url;

use crate::config::Settings;
use crate::message::Message;
use crate::state::{MountId, ShortUrlsListParams};

pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Download the remote server list
    FetchRemoteServers { url: Url },

    /// Persist the registered servers
    SaveServers { servers: ServersMap },

    /// Persist settings to `config.toml`
    SaveSettings { settings: Settings },

    /// Check `/rest/health` of the selected server
    CheckServerHealth { server: Server },

    /// Request one page of short URLs. `seq` identifies the request.
    FetchShortUrls {
        server: Server,
        params: ShortUrlsListParams,
        items_per_page: u32,
        seq: u64,
    },

    /// List tags, on behalf of `mount` when a tags selector asked
    FetchTags {
        server: Server,
        mount: Option<MountId>,
    },

    /// `POST` a new short URL
    CreateShortUrl { server: Server, data: ShortUrlData },

    /// Look up the signed-in user on behalf of `mount`
    FetchIdentity { mount: MountId },

    /// Abort every task spawned on behalf of `mount`
    AbortMount { mount: MountId },

    /// Open the identity proxy's sign-out page in the browser
    SignOut,

    /// Compare the running version against the published one
    CheckForUpdate { url: Url },

    /// Re-read servers and settings from disk
    ReloadFromDisk,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Perform `action`, then process `msg`
    pub fn action_then(action: UpdateAction, msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: Some(action),
        }
    }
}
