//! Settings changes and app update handling

use std::sync::Arc;

use shlink_core::prelude::*;
use shlink_core::{Order, ServersMap};

use crate::config::Settings;
use crate::state::{mutate, AppState, AppUpdate};

use super::navigation::refresh_route;
use super::{UpdateAction, UpdateResult};

fn save(state: &AppState) -> UpdateResult {
    UpdateResult::action(UpdateAction::SaveSettings {
        settings: Settings::clone(&state.settings),
    })
}

pub fn handle_cycle_theme(state: &mut AppState) -> UpdateResult {
    mutate(&mut state.settings, |settings| {
        settings.ui.theme = settings.ui.theme.next();
    });
    info!("Theme set to {}", state.settings.ui.theme);
    save(state)
}

pub fn handle_set_default_ordering(state: &mut AppState, order: Order) -> UpdateResult {
    mutate(&mut state.settings, |settings| {
        settings.short_urls_list.default_ordering = order;
    });
    save(state)
}

pub fn handle_update_available(state: &mut AppState, version: String) -> UpdateResult {
    info!("Shlink Console {} is available", version);
    state.app_updated = Arc::new(AppUpdate {
        available: true,
        latest_version: Some(version),
    });
    UpdateResult::none()
}

pub fn handle_reset_app_update(state: &mut AppState) -> UpdateResult {
    if state.app_updated.available {
        state.app_updated = Arc::new(AppUpdate::default());
    }
    UpdateResult::none()
}

pub fn handle_force_update(state: &mut AppState) -> UpdateResult {
    state.app_updated = Arc::new(AppUpdate::default());
    UpdateResult::action(UpdateAction::ReloadFromDisk)
}

pub fn handle_reloaded(state: &mut AppState, servers: ServersMap, settings: Settings) -> UpdateResult {
    info!("Reloaded {} server(s) and settings from disk", servers.len());
    state.servers = Arc::new(servers);
    state.settings = Arc::new(settings);
    refresh_route(state)
}
