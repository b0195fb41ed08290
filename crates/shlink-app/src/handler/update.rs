//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{
    create_short_url, identity, navigation, servers, settings, short_urls, tags, UpdateResult,
};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Tick | Message::Resize => UpdateResult::none(),

        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::Navigate(path) => navigation::handle_navigate(state, &path),
        Message::MoveCursor(delta) => navigation::handle_move_cursor(state, delta),
        Message::MoveColumn(delta) => navigation::handle_move_column(state, delta),
        Message::ToggleServersDropdown => navigation::handle_toggle_servers_dropdown(state),
        Message::MoveServersDropdown(delta) => {
            navigation::handle_move_servers_dropdown(state, delta)
        }
        Message::DismissNotice => navigation::handle_dismiss_notice(state),

        // ─────────────────────────────────────────────────────────
        // Servers
        // ─────────────────────────────────────────────────────────
        Message::FetchServers => servers::handle_fetch_servers(state),
        Message::RemoteServersLoaded(loaded) => servers::handle_remote_servers_loaded(state, loaded),
        Message::RemoteServersFailed(error) => servers::handle_remote_servers_failed(state, error),
        Message::SelectServer(id) => servers::handle_select_server(state, id),
        Message::ServerHealthChecked { server_id, outcome } => {
            servers::handle_health_checked(state, server_id, outcome)
        }
        Message::OpenCreateServer => servers::handle_open_create_server(state),
        Message::OpenEditServer(id) => servers::handle_open_edit_server(state, id),
        Message::ServerFormChanged(form) => servers::handle_form_changed(state, form),
        Message::SubmitServerForm => servers::handle_submit_form(state),
        Message::CreateServer(data) => servers::handle_create_server(state, data),
        Message::EditServer { id, data } => servers::handle_edit_server(state, id, data),
        Message::DeleteServer(id) => servers::handle_delete_server(state, id),

        // ─────────────────────────────────────────────────────────
        // Short URLs
        // ─────────────────────────────────────────────────────────
        Message::ListShortUrls => short_urls::handle_list_short_urls(state),
        Message::OrderByColumn(field) => short_urls::handle_order_by_column(state, field),
        Message::ChangePage(page) => short_urls::handle_change_page(state, page),
        Message::TagsFilterChanged(tags) => short_urls::handle_tags_filter_changed(state, tags),
        Message::ShortUrlsLoaded {
            server_id,
            seq,
            list,
        } => short_urls::handle_loaded(state, server_id, seq, list),
        Message::ShortUrlsFailed {
            server_id,
            seq,
            error,
        } => short_urls::handle_failed(state, server_id, seq, error),

        // ─────────────────────────────────────────────────────────
        // Create short URL
        // ─────────────────────────────────────────────────────────
        Message::ShortUrlFormChanged(form) => create_short_url::handle_form_changed(state, form),
        Message::ShortUrlTagsChanged(tags) => create_short_url::handle_tags_changed(state, tags),
        Message::SubmitShortUrlForm => create_short_url::handle_submit(state),
        Message::ShortUrlCreated {
            server_id,
            short_url,
        } => create_short_url::handle_created(state, server_id, short_url),
        Message::ShortUrlCreationFailed { server_id, error } => {
            create_short_url::handle_failed(state, server_id, error)
        }

        // ─────────────────────────────────────────────────────────
        // Tags
        // ─────────────────────────────────────────────────────────
        Message::ListTags => tags::handle_list_tags(state),
        Message::ListSelectorTags(mount) => tags::handle_list_selector_tags(state, mount),
        Message::TagsLoaded {
            server_id,
            mount,
            tags,
        } => tags::handle_loaded(state, server_id, mount, tags),
        Message::TagsFailed {
            server_id,
            mount,
            error,
        } => tags::handle_failed(state, server_id, mount, error),
        Message::SetTagsSearch(term) => tags::handle_set_search(state, term),
        Message::FocusTagsSearch(focused) => tags::handle_focus_search(state, focused),
        Message::OpenTagsSelector(target) => tags::handle_open_selector(state, target),
        Message::CloseTagsSelector => tags::handle_close_selector(state),
        Message::ReleaseTagsSelector(mount) => tags::handle_release_selector(state, mount),
        Message::EditTagsInput(input) => tags::handle_edit_input(state, input),
        Message::MoveTagsSuggestion(delta) => tags::handle_move_suggestion(state, delta),

        // ─────────────────────────────────────────────────────────
        // Identity
        // ─────────────────────────────────────────────────────────
        Message::FetchIdentity => identity::handle_fetch(state),
        Message::IdentityLoaded { mount, identity } => {
            identity::handle_loaded(state, mount, identity)
        }
        Message::ReleaseIdentity => identity::handle_release(state),
        Message::SignOut => identity::handle_sign_out(state),

        // ─────────────────────────────────────────────────────────
        // Settings & updates
        // ─────────────────────────────────────────────────────────
        Message::CycleTheme => settings::handle_cycle_theme(state),
        Message::SetDefaultOrdering(order) => settings::handle_set_default_ordering(state, order),
        Message::AppUpdateAvailable { version } => settings::handle_update_available(state, version),
        Message::ResetAppUpdate => settings::handle_reset_app_update(state),
        Message::ForceUpdate => settings::handle_force_update(state),
        Message::Reloaded {
            servers,
            settings: loaded,
        } => settings::handle_reloaded(state, servers, loaded),
    }
}
