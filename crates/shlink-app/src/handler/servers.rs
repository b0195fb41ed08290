//! Server registry, selection and the server form

use std::sync::Arc;

use shlink_core::prelude::*;
use shlink_core::{
    printable_version, Reachability, SelectedServer, ServerData, ServerId, ServersMap,
};

use crate::config::generate_server_id;
use crate::message::{HealthOutcome, Message};
use crate::router::{page_from_path, server_path, Route, ServerSection};
use crate::server_form::{ServerFormMode, ServerFormState};
use crate::state::{mutate, AppState, ShortUrlsListParams, ShortUrlsListState};

use super::navigation::{self, notify};
use super::{UpdateAction, UpdateResult};

pub fn handle_fetch_servers(state: &mut AppState) -> UpdateResult {
    match state.settings.connection.servers_url.clone() {
        Some(url) => UpdateResult::action(UpdateAction::FetchRemoteServers { url }),
        None => {
            debug!("No remote servers URL configured");
            UpdateResult::none()
        }
    }
}

pub fn handle_remote_servers_loaded(state: &mut AppState, loaded: ServersMap) -> UpdateResult {
    if loaded.is_empty() {
        debug!("Remote server list is empty");
        return UpdateResult::none();
    }

    info!("Loaded {} remote server(s)", loaded.len());
    mutate(&mut state.servers, |servers| servers.extend(loaded));
    UpdateResult::action_then(
        UpdateAction::SaveServers {
            servers: ServersMap::clone(&state.servers),
        },
        Message::Navigate(state.ui.location.clone()),
    )
}

pub fn handle_remote_servers_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Failed to fetch remote servers: {}", error);
    notify(state, "Could not load remote servers");
    UpdateResult::none()
}

pub fn handle_select_server(state: &mut AppState, id: ServerId) -> UpdateResult {
    let Some(server) = state.servers.get(&id).cloned() else {
        warn!("Selected unknown server {}", id);
        state.selected_server = Arc::new(SelectedServer::NotFound(id));
        return UpdateResult::none();
    };

    state.selected_server = Arc::new(SelectedServer::Checking(id));
    state.short_urls_list = Arc::new(ShortUrlsListState {
        params: ShortUrlsListParams {
            order: state.settings.short_urls_list.default_ordering,
            ..Default::default()
        },
        ..Default::default()
    });
    state.tags_list = Arc::default();

    UpdateResult::action(UpdateAction::CheckServerHealth { server })
}

pub fn handle_health_checked(
    state: &mut AppState,
    server_id: ServerId,
    outcome: HealthOutcome,
) -> UpdateResult {
    if *state.selected_server != SelectedServer::Checking(server_id.clone()) {
        debug!("Discarding stale health result for {}", server_id);
        return UpdateResult::none();
    }
    let Some(mut server) = state.servers.get(&server_id).cloned() else {
        state.selected_server = Arc::new(SelectedServer::NotFound(server_id));
        return UpdateResult::none();
    };

    match outcome {
        HealthOutcome::Reachable { version } => {
            server.version = Some(version.clone());
            server.reachability = Reachability::Reachable;
            let updated = server.clone();
            mutate(&mut state.servers, |servers| {
                servers.insert(updated.id.clone(), updated);
            });
            state.selected_server = Arc::new(SelectedServer::Reachable {
                server,
                printable_version: printable_version(&version),
                version,
            });

            match state.ui.route {
                // The tags list loads its own data once it mounts
                Route::Server {
                    section: ServerSection::ManageTags,
                    ..
                } => UpdateResult::none(),
                _ => {
                    let page = page_from_path(&state.ui.location).unwrap_or(1);
                    mutate(&mut state.short_urls_list, |list| list.params.page = page);
                    UpdateResult::message(Message::ListShortUrls)
                }
            }
        }
        HealthOutcome::NotReachable { error } => {
            warn!("Server {} is not reachable: {}", server.name, error);
            server.reachability = Reachability::NotReachable;
            let updated = server.clone();
            mutate(&mut state.servers, |servers| {
                servers.insert(updated.id.clone(), updated);
            });
            state.selected_server = Arc::new(SelectedServer::NotReachable(server));
            UpdateResult::none()
        }
    }
}

pub fn handle_open_create_server(_state: &mut AppState) -> UpdateResult {
    UpdateResult::message(Message::Navigate("/server/create".to_string()))
}

pub fn handle_open_edit_server(_state: &mut AppState, id: ServerId) -> UpdateResult {
    UpdateResult::message(Message::Navigate(format!("/server/{id}/edit")))
}

pub fn handle_form_changed(state: &mut AppState, form: ServerFormState) -> UpdateResult {
    mutate(&mut state.ui, |ui| ui.server_form = Some(form));
    UpdateResult::none()
}

pub fn handle_submit_form(state: &mut AppState) -> UpdateResult {
    let Some(form) = state.ui.server_form.clone() else {
        return UpdateResult::none();
    };

    if let Err(e) = form.data.validate() {
        mutate(&mut state.ui, |ui| {
            if let Some(form) = ui.server_form.as_mut() {
                form.error = Some(e.to_string());
            }
        });
        return UpdateResult::none();
    }

    match form.mode {
        ServerFormMode::Create => UpdateResult::message(Message::CreateServer(form.data)),
        ServerFormMode::Edit(id) => UpdateResult::message(Message::EditServer {
            id,
            data: form.data,
        }),
    }
}

pub fn handle_create_server(state: &mut AppState, data: ServerData) -> UpdateResult {
    let server = match data.into_server(generate_server_id()) {
        Ok(server) => server,
        Err(e) => {
            notify(state, e.to_string());
            return UpdateResult::none();
        }
    };

    info!("Registered server {} ({})", server.name, server.id);
    let path = server_path(&server.id);
    mutate(&mut state.servers, |servers| {
        servers.insert(server.id.clone(), server);
    });
    mutate(&mut state.ui, |ui| ui.server_form = None);

    UpdateResult::action_then(
        UpdateAction::SaveServers {
            servers: ServersMap::clone(&state.servers),
        },
        Message::Navigate(path),
    )
}

pub fn handle_edit_server(state: &mut AppState, id: ServerId, data: ServerData) -> UpdateResult {
    if !state.servers.contains_key(&id) {
        notify(state, format!("Unknown server {id}"));
        return UpdateResult::none();
    }
    let server = match data.into_server(id.clone()) {
        Ok(server) => server,
        Err(e) => {
            notify(state, e.to_string());
            return UpdateResult::none();
        }
    };

    mutate(&mut state.servers, |servers| {
        servers.insert(id.clone(), server);
    });
    mutate(&mut state.ui, |ui| ui.server_form = None);
    // Connection details may have changed: check health again on the next visit
    if state.selected_server.id() == Some(&id) {
        state.selected_server = Arc::new(SelectedServer::None);
    }

    UpdateResult::action_then(
        UpdateAction::SaveServers {
            servers: ServersMap::clone(&state.servers),
        },
        Message::Navigate(server_path(&id)),
    )
}

pub fn handle_delete_server(state: &mut AppState, id: ServerId) -> UpdateResult {
    if !state.servers.contains_key(&id) {
        return UpdateResult::none();
    }

    // Leave any route that still points at the server before removing it
    let referenced =
        state.ui.route.server_id() == Some(&id) || state.selected_server.id() == Some(&id);
    if referenced {
        navigation::go_home(state);
    }

    info!("Deleting server {}", id);
    mutate(&mut state.servers, |servers| {
        servers.remove(&id);
    });
    let cursor_max = state.servers.len().saturating_sub(1);
    if state.ui.cursor > cursor_max {
        mutate(&mut state.ui, |ui| ui.cursor = cursor_max);
    }

    UpdateResult::action_then(
        UpdateAction::SaveServers {
            servers: ServersMap::clone(&state.servers),
        },
        Message::Navigate(state.ui.location.clone()),
    )
}
