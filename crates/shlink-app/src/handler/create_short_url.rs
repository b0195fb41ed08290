//! Create short URL form and submission

use shlink_core::prelude::*;
use shlink_core::{ServerId, ShortUrl};

use crate::message::Message;
use crate::short_url_form::ShortUrlFormState;
use crate::state::{mutate, AppState};
use crate::tag_selector::TagsSelectorTarget;

use super::{UpdateAction, UpdateResult};

pub fn handle_form_changed(state: &mut AppState, form: ShortUrlFormState) -> UpdateResult {
    if state.ui.short_url_form.is_none() {
        debug!("Short URL form edit ignored: form is not shown");
        return UpdateResult::none();
    }
    mutate(&mut state.ui, |ui| ui.short_url_form = Some(form));
    UpdateResult::none()
}

/// `on_change` of the tags selector while it edits the form
pub fn handle_tags_changed(state: &mut AppState, tags: Vec<String>) -> UpdateResult {
    if state.ui.short_url_form.is_none() {
        return UpdateResult::none();
    }
    mutate(&mut state.ui, |ui| {
        if let Some(selector) = ui
            .tags_selector
            .as_mut()
            .filter(|s| s.target == TagsSelectorTarget::NewShortUrl)
        {
            selector.selected = tags.clone();
            selector.suggestion = None;
        }
        if let Some(form) = ui.short_url_form.as_mut() {
            form.tags = tags;
        }
    });
    UpdateResult::none()
}

fn set_error(state: &mut AppState, error: String) {
    mutate(&mut state.ui, |ui| {
        if let Some(form) = ui.short_url_form.as_mut() {
            form.saving = false;
            form.error = Some(error);
        }
    });
}

pub fn handle_submit(state: &mut AppState) -> UpdateResult {
    let Some(form) = state.ui.short_url_form.clone() else {
        return UpdateResult::none();
    };
    if form.saving {
        debug!("Short URL creation already in flight");
        return UpdateResult::none();
    }
    let Some(server) = state.selected_server.reachable_server().cloned() else {
        debug!("Not creating short URL: no reachable server selected");
        return UpdateResult::none();
    };

    let data = match form.data(state.supports_titles()).normalized() {
        Ok(data) => data,
        Err(e) => {
            set_error(state, e.to_string());
            return UpdateResult::none();
        }
    };

    mutate(&mut state.ui, |ui| {
        if let Some(form) = ui.short_url_form.as_mut() {
            form.saving = true;
            form.error = None;
            form.created = None;
        }
    });
    UpdateResult::action(UpdateAction::CreateShortUrl { server, data })
}

/// Reset the form and refresh the list so the new short URL shows up
pub fn handle_created(
    state: &mut AppState,
    server_id: ServerId,
    short_url: ShortUrl,
) -> UpdateResult {
    if state.selected_server.id() != Some(&server_id) {
        debug!("Discarding short URL created on {}", server_id);
        return UpdateResult::none();
    }

    info!("Created short URL {}", short_url.short_url);
    if state.ui.short_url_form.is_some() {
        mutate(&mut state.ui, |ui| {
            ui.short_url_form = Some(ShortUrlFormState::after_created(short_url));
        });
    }
    UpdateResult::message(Message::ListShortUrls)
}

pub fn handle_failed(state: &mut AppState, server_id: ServerId, error: String) -> UpdateResult {
    if state.selected_server.id() != Some(&server_id) {
        return UpdateResult::none();
    }

    warn!("Failed to create short URL on {}: {}", server_id, error);
    set_error(state, error);
    UpdateResult::none()
}
