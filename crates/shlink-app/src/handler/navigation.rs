//! Location changes, list cursors and overlays

use shlink_core::prelude::*;
use shlink_core::{OrderableField, SelectedServer};

use crate::message::Message;
use crate::router::{page_from_path, resolve_route, Resolution, Route, ServerSection};
use crate::server_form::ServerFormState;
use crate::state::{mutate, AppState};

use super::UpdateResult;

/// Resolve `path` and make it the current location, following redirects
pub fn handle_navigate(state: &mut AppState, path: &str) -> UpdateResult {
    match resolve_route(path, &state.servers) {
        Resolution::Redirect(target) => {
            debug!("Redirecting {} -> {}", path, target);
            match resolve_route(&target, &state.servers) {
                Resolution::Render(route) => apply_route(state, &target, route),
                Resolution::Redirect(again) => {
                    warn!("Redirect loop at {} -> {}", target, again);
                    apply_route(state, &target, Route::NotFound)
                }
            }
        }
        Resolution::Render(route) => apply_route(state, path, route),
    }
}

/// Re-resolve the current location, e.g. after the server list changed
pub(crate) fn refresh_route(state: &mut AppState) -> UpdateResult {
    let location = state.ui.location.clone();
    handle_navigate(state, &location)
}

/// Show the home view without resolving `/`
pub(crate) fn go_home(state: &mut AppState) {
    apply_route(state, "/", Route::Home);
}

fn apply_route(state: &mut AppState, path: &str, route: Route) -> UpdateResult {
    let route_changed = state.ui.route != route;
    let form = match &route {
        Route::CreateServer => Some(
            state
                .ui
                .server_form
                .clone()
                .filter(|f| f.mode == crate::server_form::ServerFormMode::Create)
                .unwrap_or_else(ServerFormState::create),
        ),
        Route::EditServer(id) => state.servers.get(id).map(ServerFormState::edit),
        _ => None,
    };
    let short_url_form = match &route {
        Route::Server {
            section: ServerSection::CreateShortUrl,
            ..
        } => Some(
            state
                .ui
                .short_url_form
                .clone()
                .filter(|_| !route_changed)
                .unwrap_or_default(),
        ),
        _ => None,
    };

    mutate(&mut state.ui, |ui| {
        ui.location = path.to_string();
        ui.route = route.clone();
        ui.server_form = form;
        ui.short_url_form = short_url_form;
        ui.servers_dropdown = None;
        if route_changed {
            ui.cursor = 0;
            ui.column = 0;
            ui.tags_selector = None;
            ui.search_focused = false;
        }
    });

    match route {
        Route::Server { id, section } => {
            if state.selected_server.id() != Some(&id) {
                return UpdateResult::message(Message::SelectServer(id));
            }
            match section {
                ServerSection::ShortUrls => {
                    let page = page_from_path(path).unwrap_or(1);
                    let loaded = state.short_urls_list.server_id.as_ref() == Some(&id);
                    if !loaded || state.short_urls_list.params.page != page {
                        mutate(&mut state.short_urls_list, |list| list.params.page = page);
                        return UpdateResult::message(Message::ListShortUrls);
                    }
                    UpdateResult::none()
                }
                ServerSection::CreateShortUrl | ServerSection::ManageTags => UpdateResult::none(),
            }
        }
        Route::EditServer(_) => UpdateResult::none(),
        _ => {
            if *state.selected_server != SelectedServer::None {
                state.selected_server = std::sync::Arc::new(SelectedServer::None);
            }
            UpdateResult::none()
        }
    }
}

pub fn handle_move_cursor(state: &mut AppState, delta: isize) -> UpdateResult {
    let rows = state.visible_rows();
    let next = if rows == 0 {
        0
    } else {
        (state.ui.cursor as isize + delta).clamp(0, rows as isize - 1) as usize
    };
    if next != state.ui.cursor {
        mutate(&mut state.ui, |ui| ui.cursor = next);
    }
    UpdateResult::none()
}

pub fn handle_move_column(state: &mut AppState, delta: isize) -> UpdateResult {
    let columns = OrderableField::sortable(state.supports_titles()).len() as isize;
    let next = (state.ui.column as isize + delta).rem_euclid(columns) as usize;
    mutate(&mut state.ui, |ui| ui.column = next);
    UpdateResult::none()
}

pub fn handle_toggle_servers_dropdown(state: &mut AppState) -> UpdateResult {
    if state.servers.len() < 2 {
        return UpdateResult::none();
    }
    let current = state
        .selected_server
        .id()
        .and_then(|id| state.servers.keys().position(|k| k == id))
        .unwrap_or(0);
    mutate(&mut state.ui, |ui| {
        ui.servers_dropdown = match ui.servers_dropdown {
            Some(_) => None,
            None => Some(current),
        };
    });
    UpdateResult::none()
}

pub fn handle_move_servers_dropdown(state: &mut AppState, delta: isize) -> UpdateResult {
    let count = state.servers.len() as isize;
    if count == 0 {
        return UpdateResult::none();
    }
    if let Some(current) = state.ui.servers_dropdown {
        let next = (current as isize + delta).rem_euclid(count) as usize;
        mutate(&mut state.ui, |ui| ui.servers_dropdown = Some(next));
    }
    UpdateResult::none()
}

pub fn handle_dismiss_notice(state: &mut AppState) -> UpdateResult {
    if state.ui.notice.is_some() {
        mutate(&mut state.ui, |ui| ui.notice = None);
    }
    UpdateResult::none()
}

/// Show a one-line message in the status area
pub(crate) fn notify(state: &mut AppState, notice: impl Into<String>) {
    let notice = notice.into();
    mutate(&mut state.ui, |ui| ui.notice = Some(notice));
}
