//! Short URLs list requests, ordering and paging

use shlink_core::prelude::*;
use shlink_core::{OrderableField, ServerId, ShortUrlsList};

use crate::message::Message;
use crate::router::{Route, ServerSection};
use crate::state::{mutate, AppState};
use crate::tag_selector::TagsSelectorTarget;

use super::{UpdateAction, UpdateResult};

fn list_path(id: &ServerId, page: u32) -> String {
    format!("/server/{id}/list-short-urls/{page}")
}

pub fn handle_list_short_urls(state: &mut AppState) -> UpdateResult {
    let Some(server) = state.selected_server.reachable_server().cloned() else {
        debug!("Not listing short URLs: no reachable server selected");
        return UpdateResult::none();
    };

    let seq = state.short_urls_list.request_seq + 1;
    mutate(&mut state.short_urls_list, |list| {
        list.server_id = Some(server.id.clone());
        list.request_seq = seq;
        list.loading = true;
        list.error = None;
    });

    UpdateResult::action(UpdateAction::FetchShortUrls {
        server,
        params: state.short_urls_list.params.clone(),
        items_per_page: state.settings.short_urls_list.items_per_page,
        seq,
    })
}

/// Cycle the ordering of `field` and reload from the first page
pub fn handle_order_by_column(state: &mut AppState, field: OrderableField) -> UpdateResult {
    if !OrderableField::sortable(state.supports_titles()).contains(&field) {
        debug!("{:?} is not sortable on this server", field);
        return UpdateResult::none();
    }

    let order = state.short_urls_list.params.order.toggle(field);
    mutate(&mut state.short_urls_list, |list| {
        list.params.order = order;
        list.params.page = 1;
    });
    back_to_first_page(state);
    UpdateResult::message(Message::ListShortUrls)
}

pub fn handle_change_page(state: &mut AppState, page: u32) -> UpdateResult {
    let Some(id) = state.selected_server.id().cloned() else {
        return UpdateResult::none();
    };
    let pages = state
        .short_urls_list
        .list
        .as_ref()
        .map(|l| l.pagination.pages_count.max(1))
        .unwrap_or(1);
    if page == 0 || page > pages || page == state.short_urls_list.params.page {
        return UpdateResult::none();
    }
    UpdateResult::message(Message::Navigate(list_path(&id, page)))
}

pub fn handle_tags_filter_changed(state: &mut AppState, tags: Vec<String>) -> UpdateResult {
    debug!("Tags filter changed to {:?}", tags);
    let filtering = state
        .ui
        .tags_selector
        .as_ref()
        .is_some_and(|s| s.target == TagsSelectorTarget::Filter);
    if filtering {
        let selected = tags.clone();
        mutate(&mut state.ui, |ui| {
            if let Some(selector) = ui.tags_selector.as_mut() {
                selector.selected = selected;
                selector.suggestion = None;
            }
        });
    }
    mutate(&mut state.short_urls_list, |list| {
        list.params.tags = tags;
        list.params.page = 1;
    });
    back_to_first_page(state);
    UpdateResult::message(Message::ListShortUrls)
}

/// Keep the location in sync after a change that resets paging
fn back_to_first_page(state: &mut AppState) {
    if let Route::Server {
        id,
        section: ServerSection::ShortUrls,
    } = &state.ui.route
    {
        let path = list_path(id, 1);
        mutate(&mut state.ui, |ui| {
            ui.location = path;
            ui.cursor = 0;
        });
    }
}

fn is_current(state: &AppState, server_id: &ServerId, seq: u64) -> bool {
    state.short_urls_list.request_seq == seq
        && state.short_urls_list.server_id.as_ref() == Some(server_id)
}

pub fn handle_loaded(
    state: &mut AppState,
    server_id: ServerId,
    seq: u64,
    list: ShortUrlsList,
) -> UpdateResult {
    if !is_current(state, &server_id, seq) {
        debug!("Discarding stale short URLs response #{} for {}", seq, server_id);
        return UpdateResult::none();
    }

    let rows = list.data.len();
    mutate(&mut state.short_urls_list, |current| {
        current.list = Some(list);
        current.loading = false;
        current.error = None;
    });
    if state.ui.cursor >= rows && state.ui.cursor > 0 {
        mutate(&mut state.ui, |ui| ui.cursor = rows.saturating_sub(1));
    }
    UpdateResult::none()
}

pub fn handle_failed(
    state: &mut AppState,
    server_id: ServerId,
    seq: u64,
    error: String,
) -> UpdateResult {
    if !is_current(state, &server_id, seq) {
        return UpdateResult::none();
    }

    warn!("Failed to list short URLs for {}: {}", server_id, error);
    mutate(&mut state.short_urls_list, |current| {
        current.list = None;
        current.loading = false;
        current.error = Some(error);
    });
    UpdateResult::none()
}
