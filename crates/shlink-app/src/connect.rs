//! Connector: projects store slices and bound actions into component props
//!
//! A [`Connect`] names the state slices a component reads and the actions it
//! may dispatch. At every render it builds fresh [`Props`] from the current
//! [`AppState`], and it reports whether a re-render is needed by comparing
//! the subscribed slices by reference against the last rendered snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use shlink_core::prelude::*;
use shlink_core::{
    Order, OrderableField, SelectedServer, ServerId, ServersMap, TagsList,
};

use crate::config::Settings;
use crate::message::Message;
use crate::server_form::ServerFormState;
use crate::short_url_form::ShortUrlFormState;
use crate::state::{
    AppState, AppUpdate, IdentityState, MountId, ShortUrlsListState, StateKey, UiState,
};
use crate::tag_selector::TagsSelectorTarget;

/// Actions a component can ask to have bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    FetchServers,
    ResetAppUpdate,
    ForceUpdate,
    Navigate,
    SelectServer,
    OpenCreateServer,
    OpenEditServer,
    EditServerForm,
    SubmitServerForm,
    DeleteServer,
    EditShortUrlForm,
    SubmitShortUrlForm,
    ChangeShortUrlTags,
    ListTags,
    SetTagsSearch,
    OrderByColumn,
    ChangePage,
    ChangeTagsFilter,
    OpenTagsSelector,
    CloseTagsSelector,
    EditTagsInput,
    FetchIdentity,
    ReleaseIdentity,
    SignOut,
    CycleTheme,
    SetDefaultOrdering,
    MoveCursor,
    ToggleServersDropdown,
    DismissNotice,
    Quit,
}

/// Sending side of the store's message queue
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<Message>,
}

impl Dispatcher {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }

    /// Queue a message without blocking the render thread
    pub fn dispatch(&self, message: Message) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to dispatch message: {}", e);
                false
            }
        }
    }
}

impl Default for Dispatcher {
    /// A dispatcher whose queue is already closed; every dispatch is dropped
    fn default() -> Self {
        let (tx, _rx) = mpsc::channel(1);
        Self { tx }
    }
}

/// Actions bound to the store for one component
#[derive(Debug, Clone, Default)]
pub struct BoundActions {
    keys: Arc<HashSet<ActionKey>>,
    dispatcher: Dispatcher,
}

impl BoundActions {
    pub fn new(keys: impl IntoIterator<Item = ActionKey>, dispatcher: Dispatcher) -> Self {
        Self {
            keys: Arc::new(keys.into_iter().collect()),
            dispatcher,
        }
    }

    pub fn is_bound(&self, key: ActionKey) -> bool {
        self.keys.contains(&key)
    }

    fn send(&self, key: ActionKey, message: Message) -> bool {
        if !self.is_bound(key) {
            warn!("Action {:?} is not bound for this component", key);
            return false;
        }
        self.dispatcher.dispatch(message)
    }

    pub fn fetch_servers(&self) -> bool {
        self.send(ActionKey::FetchServers, Message::FetchServers)
    }

    pub fn reset_app_update(&self) -> bool {
        self.send(ActionKey::ResetAppUpdate, Message::ResetAppUpdate)
    }

    pub fn force_update(&self) -> bool {
        self.send(ActionKey::ForceUpdate, Message::ForceUpdate)
    }

    pub fn navigate(&self, path: impl Into<String>) -> bool {
        self.send(ActionKey::Navigate, Message::Navigate(path.into()))
    }

    pub fn select_server(&self, id: ServerId) -> bool {
        self.send(ActionKey::SelectServer, Message::SelectServer(id))
    }

    pub fn open_create_server(&self) -> bool {
        self.send(ActionKey::OpenCreateServer, Message::OpenCreateServer)
    }

    pub fn open_edit_server(&self, id: ServerId) -> bool {
        self.send(ActionKey::OpenEditServer, Message::OpenEditServer(id))
    }

    pub fn edit_server_form(&self, form: ServerFormState) -> bool {
        self.send(ActionKey::EditServerForm, Message::ServerFormChanged(form))
    }

    pub fn submit_server_form(&self) -> bool {
        self.send(ActionKey::SubmitServerForm, Message::SubmitServerForm)
    }

    pub fn delete_server(&self, id: ServerId) -> bool {
        self.send(ActionKey::DeleteServer, Message::DeleteServer(id))
    }

    pub fn edit_short_url_form(&self, form: ShortUrlFormState) -> bool {
        self.send(ActionKey::EditShortUrlForm, Message::ShortUrlFormChanged(form))
    }

    pub fn submit_short_url_form(&self) -> bool {
        self.send(ActionKey::SubmitShortUrlForm, Message::SubmitShortUrlForm)
    }

    /// `on_change` of the tags selector while it edits a new short URL
    pub fn change_short_url_tags(&self, tags: Vec<String>) -> bool {
        self.send(ActionKey::ChangeShortUrlTags, Message::ShortUrlTagsChanged(tags))
    }

    pub fn list_tags(&self) -> bool {
        self.send(ActionKey::ListTags, Message::ListTags)
    }

    /// Load suggestions on behalf of the selector mounted as `mount`
    pub fn list_selector_tags(&self, mount: MountId) -> bool {
        self.send(ActionKey::ListTags, Message::ListSelectorTags(mount))
    }

    pub fn set_tags_search(&self, term: impl Into<String>) -> bool {
        self.send(ActionKey::SetTagsSearch, Message::SetTagsSearch(term.into()))
    }

    pub fn focus_tags_search(&self, focused: bool) -> bool {
        self.send(ActionKey::SetTagsSearch, Message::FocusTagsSearch(focused))
    }

    pub fn order_by_column(&self, field: OrderableField) -> bool {
        self.send(ActionKey::OrderByColumn, Message::OrderByColumn(field))
    }

    pub fn move_column(&self, delta: isize) -> bool {
        self.send(ActionKey::OrderByColumn, Message::MoveColumn(delta))
    }

    pub fn change_page(&self, page: u32) -> bool {
        self.send(ActionKey::ChangePage, Message::ChangePage(page))
    }

    /// `on_change` of the tags selector
    pub fn change_tags_filter(&self, tags: Vec<String>) -> bool {
        self.send(ActionKey::ChangeTagsFilter, Message::TagsFilterChanged(tags))
    }

    pub fn open_tags_selector(&self, target: TagsSelectorTarget) -> bool {
        self.send(
            ActionKey::OpenTagsSelector,
            Message::OpenTagsSelector(target),
        )
    }

    pub fn close_tags_selector(&self) -> bool {
        self.send(ActionKey::CloseTagsSelector, Message::CloseTagsSelector)
    }

    pub fn release_tags_selector(&self, mount: MountId) -> bool {
        self.send(
            ActionKey::CloseTagsSelector,
            Message::ReleaseTagsSelector(mount),
        )
    }

    pub fn edit_tags_input(&self, input: impl Into<String>) -> bool {
        self.send(ActionKey::EditTagsInput, Message::EditTagsInput(input.into()))
    }

    pub fn move_tags_suggestion(&self, delta: isize) -> bool {
        self.send(ActionKey::EditTagsInput, Message::MoveTagsSuggestion(delta))
    }

    pub fn fetch_identity(&self) -> bool {
        self.send(ActionKey::FetchIdentity, Message::FetchIdentity)
    }

    pub fn release_identity(&self) -> bool {
        self.send(ActionKey::ReleaseIdentity, Message::ReleaseIdentity)
    }

    pub fn sign_out(&self) -> bool {
        self.send(ActionKey::SignOut, Message::SignOut)
    }

    pub fn cycle_theme(&self) -> bool {
        self.send(ActionKey::CycleTheme, Message::CycleTheme)
    }

    pub fn set_default_ordering(&self, order: Order) -> bool {
        self.send(ActionKey::SetDefaultOrdering, Message::SetDefaultOrdering(order))
    }

    pub fn move_cursor(&self, delta: isize) -> bool {
        self.send(ActionKey::MoveCursor, Message::MoveCursor(delta))
    }

    pub fn toggle_servers_dropdown(&self) -> bool {
        self.send(ActionKey::ToggleServersDropdown, Message::ToggleServersDropdown)
    }

    pub fn move_servers_dropdown(&self, delta: isize) -> bool {
        self.send(
            ActionKey::ToggleServersDropdown,
            Message::MoveServersDropdown(delta),
        )
    }

    pub fn dismiss_notice(&self) -> bool {
        self.send(ActionKey::DismissNotice, Message::DismissNotice)
    }

    pub fn quit(&self) -> bool {
        self.send(ActionKey::Quit, Message::Quit)
    }
}

/// Props passed explicitly by a parent. Set fields win over projected slices.
#[derive(Debug, Clone, Default)]
pub struct OwnProps {
    pub servers: Option<Arc<ServersMap>>,
    pub selected_server: Option<Arc<SelectedServer>>,
    pub settings: Option<Arc<Settings>>,
    pub app_updated: Option<Arc<AppUpdate>>,
    pub tags_list: Option<Arc<TagsList>>,
    pub short_urls_list: Option<Arc<ShortUrlsListState>>,
    pub identity: Option<Arc<IdentityState>>,
    pub ui: Option<Arc<UiState>>,
    /// Tags shown as selected, overriding the store's selection
    pub selected_tags: Option<Vec<String>>,
}

/// What a connected component receives at render time
#[derive(Debug, Clone, Default)]
pub struct Props {
    pub servers: Option<Arc<ServersMap>>,
    pub selected_server: Option<Arc<SelectedServer>>,
    pub settings: Option<Arc<Settings>>,
    pub app_updated: Option<Arc<AppUpdate>>,
    pub tags_list: Option<Arc<TagsList>>,
    pub short_urls_list: Option<Arc<ShortUrlsListState>>,
    pub identity: Option<Arc<IdentityState>>,
    pub ui: Option<Arc<UiState>>,
    pub selected_tags: Option<Vec<String>>,
    pub actions: BoundActions,
}

impl Props {
    /// Props built from explicit values only, as in widget tests
    pub fn from_own(own: OwnProps) -> Self {
        Self {
            servers: own.servers,
            selected_server: own.selected_server,
            settings: own.settings,
            app_updated: own.app_updated,
            tags_list: own.tags_list,
            short_urls_list: own.short_urls_list,
            identity: own.identity,
            ui: own.ui,
            selected_tags: own.selected_tags,
            actions: BoundActions::default(),
        }
    }

    pub fn with_actions(mut self, actions: BoundActions) -> Self {
        self.actions = actions;
        self
    }

    /// Number of registered servers, zero when not subscribed
    pub fn servers_count(&self) -> usize {
        self.servers.as_ref().map(|s| s.len()).unwrap_or(0)
    }
}

/// Connection declaration of one component
#[derive(Debug, Clone, Default)]
pub struct Connect {
    state_keys: Vec<StateKey>,
    action_keys: Vec<ActionKey>,
}

/// Declare the slices and actions a component is connected to
pub fn connect(state_keys: &[StateKey], action_keys: &[ActionKey]) -> Connect {
    Connect {
        state_keys: state_keys.to_vec(),
        action_keys: action_keys.to_vec(),
    }
}

impl Connect {
    pub fn state_keys(&self) -> &[StateKey] {
        &self.state_keys
    }

    pub fn action_keys(&self) -> &[ActionKey] {
        &self.action_keys
    }

    pub fn subscribes_to(&self, key: StateKey) -> bool {
        self.state_keys.contains(&key)
    }

    /// Build the props for one render pass
    pub fn project(&self, state: &AppState, dispatcher: &Dispatcher, own: OwnProps) -> Props {
        let pick = |key: StateKey| self.subscribes_to(key);

        Props {
            servers: own
                .servers
                .or_else(|| pick(StateKey::Servers).then(|| state.servers.clone())),
            selected_server: own.selected_server.or_else(|| {
                pick(StateKey::SelectedServer).then(|| state.selected_server.clone())
            }),
            settings: own
                .settings
                .or_else(|| pick(StateKey::Settings).then(|| state.settings.clone())),
            app_updated: own
                .app_updated
                .or_else(|| pick(StateKey::AppUpdated).then(|| state.app_updated.clone())),
            tags_list: own
                .tags_list
                .or_else(|| pick(StateKey::TagsList).then(|| state.tags_list.clone())),
            short_urls_list: own.short_urls_list.or_else(|| {
                pick(StateKey::ShortUrlsList).then(|| state.short_urls_list.clone())
            }),
            identity: own
                .identity
                .or_else(|| pick(StateKey::Identity).then(|| state.identity.clone())),
            ui: own
                .ui
                .or_else(|| pick(StateKey::Ui).then(|| state.ui.clone())),
            selected_tags: own.selected_tags,
            actions: BoundActions::new(self.action_keys.iter().copied(), dispatcher.clone()),
        }
    }

    /// Whether any subscribed slice changed since `last` was rendered
    pub fn should_render(&self, last: Option<&AppState>, now: &AppState) -> bool {
        match last {
            None => true,
            Some(previous) => self
                .state_keys
                .iter()
                .any(|key| now.slice_changed(previous, *key)),
        }
    }
}
