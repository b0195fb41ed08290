//! Message processing
//!
//! Runs a message and its follow-ups through the TEA update function and hands
//! every resulting action to the background executor.

use tokio::sync::mpsc;

use crate::actions::{handle_action, ActionContext};
use crate::api::ShlinkApi;
use crate::handler;
use crate::identity::IdentityProvider;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<A, I>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    ctx: &ActionContext<A, I>,
) where
    A: ShlinkApi + Sync + 'static,
    I: IdentityProvider + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), ctx);
        }

        msg = result.message;
    }
}
