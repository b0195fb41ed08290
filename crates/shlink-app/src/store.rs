//! Store: single owner of [`AppState`]
//!
//! Every message goes through [`Store::dispatch`], which runs the TEA update
//! loop and reports the slices that changed so the UI re-renders only the
//! components subscribed to them.

use tokio::sync::mpsc;

use crate::actions::{handle_action, ActionContext};
use crate::api::ShlinkApi;
use crate::connect::Dispatcher;
use crate::handler::UpdateAction;
use crate::identity::IdentityProvider;
use crate::message::Message;
use crate::process::process_message;
use crate::state::{AppState, StateKey};

pub struct Store<A, I> {
    state: AppState,
    msg_tx: mpsc::Sender<Message>,
    ctx: ActionContext<A, I>,
}

impl<A, I> Store<A, I>
where
    A: ShlinkApi + Sync + 'static,
    I: IdentityProvider + Sync + 'static,
{
    pub fn new(state: AppState, msg_tx: mpsc::Sender<Message>, ctx: ActionContext<A, I>) -> Self {
        Self { state, msg_tx, ctx }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle components use to send messages back to this store
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.msg_tx.clone())
    }

    /// Process `message` and its follow-ups, returning the slices that changed
    pub fn dispatch(&mut self, message: Message) -> Vec<StateKey> {
        let before = self.state.clone();
        process_message(&mut self.state, message, &self.msg_tx, &self.ctx);
        StateKey::ALL
            .into_iter()
            .filter(|key| self.state.slice_changed(&before, *key))
            .collect()
    }

    /// Run an action that no message produced, e.g. the startup update check
    pub fn run(&self, action: UpdateAction) {
        handle_action(action, self.msg_tx.clone(), &self.ctx);
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::actions::ActionContext;
    use crate::api::{Health, ShlinkApi};
    use crate::config::MockServersRepository;
    use crate::identity::IdentityProvider;
    use crate::message::Message;
    use crate::state::{AppState, ShortUrlsListParams, StateKey};
    use shlink_core::{
        Error, Result, Server, ServerData, ShortUrl, ShortUrlData, ShortUrlsList, TagsList,
    };
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use url::Url;

    struct OfflineApi;

    impl ShlinkApi for OfflineApi {
        async fn health(&self, _server: &Server) -> Result<Health> {
            Err(Error::http("offline"))
        }

        async fn list_short_urls(
            &self,
            _server: &Server,
            _params: &ShortUrlsListParams,
            _items_per_page: u32,
        ) -> Result<ShortUrlsList> {
            Err(Error::http("offline"))
        }

        async fn create_short_url(&self, _server: &Server, _data: &ShortUrlData) -> Result<ShortUrl> {
            Err(Error::http("offline"))
        }

        async fn list_tags(&self, _server: &Server) -> Result<TagsList> {
            Err(Error::http("offline"))
        }

        async fn fetch_servers(&self, _url: &Url) -> Result<Vec<ServerData>> {
            Err(Error::http("offline"))
        }

        async fn latest_version(&self, _url: &Url) -> Result<String> {
            Err(Error::http("offline"))
        }
    }

    struct NoIdentity;

    impl IdentityProvider for NoIdentity {
        async fn user_email(&self) -> Result<String> {
            Err(Error::identity("not configured"))
        }

        fn sign_out_url(&self) -> Option<String> {
            None
        }
    }

    fn store() -> (Store<OfflineApi, NoIdentity>, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(8);
        let ctx = ActionContext::new(
            Arc::new(OfflineApi),
            Arc::new(NoIdentity),
            Arc::new(MockServersRepository::new()),
            std::env::temp_dir(),
        );
        (Store::new(AppState::default(), tx, ctx), rx)
    }

    #[tokio::test]
    async fn test_dispatch_reports_changed_slices() {
        let (mut store, _rx) = store();

        let changed = store.dispatch(Message::MoveCursor(0));
        assert!(changed.is_empty());

        let changed = store.dispatch(Message::Navigate("/settings".to_string()));
        assert_eq!(changed, vec![StateKey::Ui]);
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut store, _rx) = store();
        store.dispatch(Message::Quit);
        assert!(store.should_quit());
    }

    #[tokio::test]
    async fn test_identity_failure_round_trip() {
        let (mut store, mut rx) = store();

        store.dispatch(Message::FetchIdentity);
        let reply = rx.recv().await.expect("identity reply");
        store.dispatch(reply);

        assert_eq!(store.state().identity.identity.display(), "n/a");
    }
}
