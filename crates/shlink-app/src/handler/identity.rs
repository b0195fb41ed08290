//! Header identity lookup and sign out

use std::sync::Arc;

use shlink_core::prelude::*;

use crate::state::{AppState, Identity, IdentityState, MountId};

use super::{UpdateAction, UpdateResult};

/// Start a lookup owned by a fresh mount token
pub fn handle_fetch(state: &mut AppState) -> UpdateResult {
    let mount = state.next_mount();
    state.identity = Arc::new(IdentityState {
        identity: Identity::Loading,
        mount: Some(mount),
    });
    UpdateResult::action(UpdateAction::FetchIdentity { mount })
}

pub fn handle_loaded(state: &mut AppState, mount: MountId, identity: Identity) -> UpdateResult {
    if state.identity.mount != Some(mount) {
        debug!("Discarding identity for unmounted header #{}", mount);
        return UpdateResult::none();
    }
    state.identity = Arc::new(IdentityState {
        identity,
        mount: None,
    });
    UpdateResult::none()
}

/// The header went away: forget and abort its pending lookup
pub fn handle_release(state: &mut AppState) -> UpdateResult {
    let Some(mount) = state.identity.mount else {
        return UpdateResult::none();
    };
    state.identity = Arc::new(IdentityState {
        identity: state.identity.identity.clone(),
        mount: None,
    });
    UpdateResult::action(UpdateAction::AbortMount { mount })
}

pub fn handle_sign_out(state: &mut AppState) -> UpdateResult {
    info!("Signing out");
    state.identity = Arc::new(IdentityState {
        identity: Identity::Unavailable,
        mount: None,
    });
    UpdateResult::action(UpdateAction::SignOut)
}
