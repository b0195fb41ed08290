//! Tags list and the tags selector

use shlink_core::prelude::*;
use shlink_core::{ServerId, TagsList};

use crate::state::{mutate, AppState, MountId};
use crate::tag_selector::{suggestions, TagsSelectorState, TagsSelectorTarget};

use super::{UpdateAction, UpdateResult};

pub fn handle_list_tags(state: &mut AppState) -> UpdateResult {
    let Some(server) = state.selected_server.reachable_server().cloned() else {
        debug!("Not listing tags: no reachable server selected");
        return UpdateResult::none();
    };

    mutate(&mut state.tags_list, |tags| {
        tags.loading = true;
        tags.error = false;
    });
    UpdateResult::action(UpdateAction::FetchTags {
        server,
        mount: None,
    })
}

fn selector_mount(state: &AppState) -> Option<MountId> {
    state.ui.tags_selector.as_ref().map(|s| s.mount)
}

/// Load suggestions for the selector opened as `mount`
pub fn handle_list_selector_tags(state: &mut AppState, mount: MountId) -> UpdateResult {
    if selector_mount(state) != Some(mount) {
        debug!("Not listing tags for closed selector #{}", mount);
        return UpdateResult::none();
    }
    let Some(server) = state.selected_server.reachable_server().cloned() else {
        return UpdateResult::none();
    };
    UpdateResult::action(UpdateAction::FetchTags {
        server,
        mount: Some(mount),
    })
}

/// Whether a response is still wanted: it must be for the selected server and,
/// when owned by a selector, that selector must still be open.
fn is_current(state: &AppState, server_id: &ServerId, mount: Option<MountId>) -> bool {
    if state.selected_server.id() != Some(server_id) {
        debug!("Discarding tags of previously selected server {}", server_id);
        return false;
    }
    match mount {
        Some(mount) if selector_mount(state) != Some(mount) => {
            debug!("Discarding tags for closed selector #{}", mount);
            false
        }
        _ => true,
    }
}

pub fn handle_loaded(
    state: &mut AppState,
    server_id: ServerId,
    mount: Option<MountId>,
    tags: TagsList,
) -> UpdateResult {
    if !is_current(state, &server_id, mount) {
        return UpdateResult::none();
    }

    let search_term = state.tags_list.search_term.clone();
    state.tags_list = std::sync::Arc::new(TagsList {
        search_term,
        loading: false,
        error: false,
        ..tags
    });
    UpdateResult::none()
}

pub fn handle_failed(
    state: &mut AppState,
    server_id: ServerId,
    mount: Option<MountId>,
    error: String,
) -> UpdateResult {
    if !is_current(state, &server_id, mount) {
        return UpdateResult::none();
    }

    warn!("Failed to list tags for {}: {}", server_id, error);
    // The selector only loses its suggestions
    if mount.is_none() {
        mutate(&mut state.tags_list, |tags| {
            tags.loading = false;
            tags.error = true;
        });
    }
    UpdateResult::none()
}

pub fn handle_set_search(state: &mut AppState, term: String) -> UpdateResult {
    mutate(&mut state.tags_list, |tags| tags.search_term = term);
    if state.ui.cursor != 0 {
        mutate(&mut state.ui, |ui| ui.cursor = 0);
    }
    UpdateResult::none()
}

pub fn handle_focus_search(state: &mut AppState, focused: bool) -> UpdateResult {
    if state.ui.search_focused != focused {
        mutate(&mut state.ui, |ui| ui.search_focused = focused);
    }
    UpdateResult::none()
}

pub fn handle_open_selector(state: &mut AppState, target: TagsSelectorTarget) -> UpdateResult {
    if state.ui.tags_selector.is_some() {
        return UpdateResult::none();
    }
    let selected = match target {
        TagsSelectorTarget::Filter => state.short_urls_list.params.tags.clone(),
        TagsSelectorTarget::NewShortUrl => match state.ui.short_url_form.as_ref() {
            Some(form) => form.tags.clone(),
            None => {
                debug!("Not opening tags selector: no short URL form");
                return UpdateResult::none();
            }
        },
    };
    let mount = state.next_mount();
    mutate(&mut state.ui, |ui| {
        ui.tags_selector = Some(TagsSelectorState::new(mount, selected).with_target(target));
    });
    UpdateResult::none()
}

/// Close the selector and abort the request it owns
pub fn handle_close_selector(state: &mut AppState) -> UpdateResult {
    let Some(mount) = selector_mount(state) else {
        return UpdateResult::none();
    };
    mutate(&mut state.ui, |ui| ui.tags_selector = None);
    UpdateResult::action(UpdateAction::AbortMount { mount })
}

/// The selector mounted as `mount` went away
pub fn handle_release_selector(state: &mut AppState, mount: MountId) -> UpdateResult {
    if selector_mount(state) == Some(mount) {
        mutate(&mut state.ui, |ui| ui.tags_selector = None);
    }
    UpdateResult::action(UpdateAction::AbortMount { mount })
}

pub fn handle_edit_input(state: &mut AppState, input: String) -> UpdateResult {
    if state.ui.tags_selector.is_none() {
        debug!("Tags input ignored: selector is closed");
        return UpdateResult::none();
    }
    mutate(&mut state.ui, |ui| {
        if let Some(selector) = ui.tags_selector.as_mut() {
            selector.input = input;
            selector.suggestion = None;
        }
    });
    UpdateResult::none()
}

pub fn handle_move_suggestion(state: &mut AppState, delta: isize) -> UpdateResult {
    let Some(selector) = state.ui.tags_selector.as_ref() else {
        return UpdateResult::none();
    };
    let count = suggestions(&state.tags_list.tags, &selector.selected, &selector.input).len();
    if count == 0 {
        return UpdateResult::none();
    }

    let next = match selector.suggestion {
        None if delta >= 0 => 0,
        None => count - 1,
        Some(current) => (current as isize + delta).rem_euclid(count as isize) as usize,
    };
    mutate(&mut state.ui, |ui| {
        if let Some(selector) = ui.tags_selector.as_mut() {
            selector.suggestion = Some(next);
        }
    });
    UpdateResult::none()
}
