//! Action handlers: UpdateAction dispatch and background task spawning

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use shlink_core::prelude::*;
use shlink_core::SemVer;

use crate::api::ShlinkApi;
use crate::config::{load_settings, save_settings, servers_from_data, ServersRepository};
use crate::handler::UpdateAction;
use crate::identity::{resolve_identity, IdentityProvider};
use crate::message::{HealthOutcome, Message};
use crate::state::MountId;

/// Tasks spawned on behalf of a mounted component, aborted when it unmounts
pub type MountTaskMap = Arc<Mutex<HashMap<MountId, Vec<JoinHandle<()>>>>>;

/// Services shared by every spawned action
pub struct ActionContext<A, I> {
    pub api: Arc<A>,
    pub identity: Arc<I>,
    pub servers_repo: Arc<dyn ServersRepository>,
    pub config_dir: PathBuf,
    pub mount_tasks: MountTaskMap,
}

impl<A, I> ActionContext<A, I> {
    pub fn new(
        api: Arc<A>,
        identity: Arc<I>,
        servers_repo: Arc<dyn ServersRepository>,
        config_dir: PathBuf,
    ) -> Self {
        Self {
            api,
            identity,
            servers_repo,
            config_dir,
            mount_tasks: Arc::default(),
        }
    }

    /// Number of live tasks owned by `mount`
    pub fn pending_for(&self, mount: MountId) -> usize {
        self.mount_tasks
            .lock()
            .map(|tasks| {
                tasks
                    .get(&mount)
                    .map(|handles| handles.iter().filter(|h| !h.is_finished()).count())
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

impl<A, I> Clone for ActionContext<A, I> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            identity: self.identity.clone(),
            servers_repo: self.servers_repo.clone(),
            config_dir: self.config_dir.clone(),
            mount_tasks: self.mount_tasks.clone(),
        }
    }
}

/// Execute an action by spawning a background task
pub fn handle_action<A, I>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    ctx: &ActionContext<A, I>,
) where
    A: ShlinkApi + Sync + 'static,
    I: IdentityProvider + Sync + 'static,
{
    match action {
        UpdateAction::FetchRemoteServers { url } => {
            let api = ctx.api.clone();
            tokio::spawn(async move {
                let msg = match api.fetch_servers(&url).await {
                    Ok(data) => Message::RemoteServersLoaded(servers_from_data(data)),
                    Err(e) => Message::RemoteServersFailed(e.to_string()),
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::SaveServers { servers } => {
            let repo = ctx.servers_repo.clone();
            tokio::spawn(async move {
                if let Err(e) = repo.save(&servers) {
                    error!("Failed to save servers: {}", e);
                }
            });
        }

        UpdateAction::SaveSettings { settings } => {
            let config_dir = ctx.config_dir.clone();
            tokio::spawn(async move {
                if let Err(e) = save_settings(&config_dir, &settings) {
                    error!("Failed to save settings: {}", e);
                }
            });
        }

        UpdateAction::CheckServerHealth { server } => {
            let api = ctx.api.clone();
            tokio::spawn(async move {
                let outcome = match api.health(&server).await {
                    Ok(health) => HealthOutcome::Reachable {
                        version: health.version,
                    },
                    Err(e) => HealthOutcome::NotReachable {
                        error: e.to_string(),
                    },
                };
                let _ = msg_tx
                    .send(Message::ServerHealthChecked {
                        server_id: server.id.clone(),
                        outcome,
                    })
                    .await;
            });
        }

        UpdateAction::FetchShortUrls {
            server,
            params,
            items_per_page,
            seq,
        } => {
            let api = ctx.api.clone();
            tokio::spawn(async move {
                let server_id = server.id.clone();
                let msg = match api.list_short_urls(&server, &params, items_per_page).await {
                    Ok(list) => Message::ShortUrlsLoaded {
                        server_id,
                        seq,
                        list,
                    },
                    Err(e) => Message::ShortUrlsFailed {
                        server_id,
                        seq,
                        error: e.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::FetchTags { server, mount } => {
            let api = ctx.api.clone();
            let handle = tokio::spawn(async move {
                let server_id = server.id.clone();
                let msg = match api.list_tags(&server).await {
                    Ok(tags) => Message::TagsLoaded {
                        server_id,
                        mount,
                        tags,
                    },
                    Err(e) => Message::TagsFailed {
                        server_id,
                        mount,
                        error: e.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
            if let Some(mount) = mount {
                track_mount_task(&ctx.mount_tasks, mount, handle);
            }
        }

        UpdateAction::CreateShortUrl { server, data } => {
            let api = ctx.api.clone();
            tokio::spawn(async move {
                let server_id = server.id.clone();
                let msg = match api.create_short_url(&server, &data).await {
                    Ok(short_url) => Message::ShortUrlCreated {
                        server_id,
                        short_url,
                    },
                    Err(e) => Message::ShortUrlCreationFailed {
                        server_id,
                        error: e.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::FetchIdentity { mount } => {
            let provider = ctx.identity.clone();
            let handle = tokio::spawn(async move {
                let identity = resolve_identity(provider.as_ref()).await;
                let _ = msg_tx
                    .send(Message::IdentityLoaded { mount, identity })
                    .await;
            });
            track_mount_task(&ctx.mount_tasks, mount, handle);
        }

        UpdateAction::AbortMount { mount } => {
            abort_mount(&ctx.mount_tasks, mount);
        }

        UpdateAction::SignOut => match ctx.identity.sign_out_url() {
            Some(url) => {
                if let Err(e) = open::that(&url) {
                    warn!("Could not open {}: {}", url, e);
                }
            }
            None => debug!("Sign out requested without an identity endpoint"),
        },

        UpdateAction::CheckForUpdate { url } => {
            let api = ctx.api.clone();
            tokio::spawn(async move {
                match api.latest_version(&url).await {
                    Ok(latest) if is_newer(&latest, env!("CARGO_PKG_VERSION")) => {
                        let _ = msg_tx
                            .send(Message::AppUpdateAvailable { version: latest })
                            .await;
                    }
                    Ok(latest) => debug!("Running the latest release ({})", latest),
                    Err(e) => debug!("Update check failed: {}", e),
                }
            });
        }

        UpdateAction::ReloadFromDisk => {
            let repo = ctx.servers_repo.clone();
            let config_dir = ctx.config_dir.clone();
            tokio::spawn(async move {
                let servers = match repo.load() {
                    Ok(servers) => servers,
                    Err(e) => {
                        error!("Failed to reload servers: {}", e);
                        return;
                    }
                };
                let settings = load_settings(&config_dir);
                let _ = msg_tx.send(Message::Reloaded { servers, settings }).await;
            });
        }
    }
}

fn track_mount_task(tasks: &MountTaskMap, mount: MountId, handle: JoinHandle<()>) {
    match tasks.lock() {
        Ok(mut tasks) => {
            let handles = tasks.entry(mount).or_default();
            handles.retain(|h| !h.is_finished());
            handles.push(handle);
        }
        Err(e) => warn!("Mount task map poisoned: {}", e),
    }
}

fn abort_mount(tasks: &MountTaskMap, mount: MountId) {
    let handles = match tasks.lock() {
        Ok(mut tasks) => tasks.remove(&mount).unwrap_or_default(),
        Err(e) => {
            warn!("Mount task map poisoned: {}", e);
            return;
        }
    };
    if !handles.is_empty() {
        debug!("Aborting {} task(s) of mount #{}", handles.len(), mount);
    }
    for handle in handles {
        handle.abort();
    }
}

/// Whether `latest` is a later release than `current`
fn is_newer(latest: &str, current: &str) -> bool {
    match (SemVer::parse(latest), SemVer::parse(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_action, is_newer, ActionContext};
    use crate::api::{Health, ShlinkApi};
    use crate::config::{MockServersRepository, Settings};
    use crate::handler::UpdateAction;
    use crate::identity::IdentityProvider;
    use crate::message::{HealthOutcome, Message};
    use crate::state::ShortUrlsListParams;
    use shlink_core::{
        Error, Result, Server, ServerData, ServerId, ServersMap, ShortUrl, ShortUrlData,
        ShortUrlsList, TagsList,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use url::Url;

    #[derive(Default)]
    struct FakeApi {
        version: Option<String>,
        slow_tags: bool,
    }

    impl ShlinkApi for FakeApi {
        async fn health(&self, _server: &Server) -> Result<Health> {
            match &self.version {
                Some(version) => Ok(Health {
                    status: "pass".to_string(),
                    version: version.clone(),
                }),
                None => Err(Error::http("connection refused")),
            }
        }

        async fn list_short_urls(
            &self,
            _server: &Server,
            _params: &ShortUrlsListParams,
            _items_per_page: u32,
        ) -> Result<ShortUrlsList> {
            Ok(ShortUrlsList::default())
        }

        async fn list_tags(&self, _server: &Server) -> Result<TagsList> {
            if self.slow_tags {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Ok(TagsList::with_tags(vec!["foo".to_string()], vec![]))
        }

        async fn create_short_url(
            &self,
            _server: &Server,
            data: &ShortUrlData,
        ) -> Result<ShortUrl> {
            let mut short_url: ShortUrl = serde_json::from_value(serde_json::json!({
                "shortCode": "abc",
                "shortUrl": "https://s.test/abc",
                "longUrl": data.long_url,
                "dateCreated": "2024-01-01T00:00:00+00:00",
            }))
            .map_err(|e| Error::http(e.to_string()))?;
            short_url.tags = data.tags.clone();
            short_url.title = data.title.clone();
            Ok(short_url)
        }

        async fn fetch_servers(&self, _url: &Url) -> Result<Vec<ServerData>> {
            Ok(vec![ServerData {
                name: "Remote".to_string(),
                url: "https://remote.test".to_string(),
                api_key: "k".to_string(),
            }])
        }

        async fn latest_version(&self, _url: &Url) -> Result<String> {
            Ok("999.0.0".to_string())
        }
    }

    /// Never answers within a test's lifetime
    struct SlowIdentity;

    impl IdentityProvider for SlowIdentity {
        async fn user_email(&self) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("late@example.test".to_string())
        }

        fn sign_out_url(&self) -> Option<String> {
            None
        }
    }

    fn context(api: FakeApi, repo: MockServersRepository) -> ActionContext<FakeApi, SlowIdentity> {
        ActionContext::new(
            Arc::new(api),
            Arc::new(SlowIdentity),
            Arc::new(repo),
            std::env::temp_dir(),
        )
    }

    fn server() -> Server {
        Server::new(ServerId::new("a"), "A", "https://a.test", "key").unwrap()
    }

    async fn next_message(rx: &mut mpsc::Receiver<Message>) -> Option<Message> {
        tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn test_health_check_reports_version() {
        let ctx = context(
            FakeApi {
                version: Some("3.1.0".to_string()),
                ..FakeApi::default()
            },
            MockServersRepository::new(),
        );
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(UpdateAction::CheckServerHealth { server: server() }, tx, &ctx);

        match next_message(&mut rx).await {
            Some(Message::ServerHealthChecked { server_id, outcome }) => {
                assert_eq!(server_id.as_str(), "a");
                assert_eq!(
                    outcome,
                    HealthOutcome::Reachable {
                        version: "3.1.0".to_string()
                    }
                );
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_health_check_is_not_reachable() {
        let ctx = context(FakeApi::default(), MockServersRepository::new());
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(UpdateAction::CheckServerHealth { server: server() }, tx, &ctx);

        assert!(matches!(
            next_message(&mut rx).await,
            Some(Message::ServerHealthChecked {
                outcome: HealthOutcome::NotReachable { .. },
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_short_urls_response_carries_sequence() {
        let ctx = context(FakeApi::default(), MockServersRepository::new());
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::FetchShortUrls {
                server: server(),
                params: ShortUrlsListParams::default(),
                items_per_page: 20,
                seq: 7,
            },
            tx,
            &ctx,
        );

        assert!(matches!(
            next_message(&mut rx).await,
            Some(Message::ShortUrlsLoaded { seq: 7, .. })
        ));
    }

    #[tokio::test]
    async fn test_remote_servers_get_fresh_ids() {
        let ctx = context(FakeApi::default(), MockServersRepository::new());
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::FetchRemoteServers {
                url: Url::parse("https://cfg.test/servers.json").unwrap(),
            },
            tx,
            &ctx,
        );

        match next_message(&mut rx).await {
            Some(Message::RemoteServersLoaded(servers)) => {
                assert_eq!(servers.len(), 1);
                let server = servers.values().next().unwrap();
                assert_eq!(server.name, "Remote");
                assert!(!server.id.as_str().is_empty());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_abort_mount_cancels_identity_lookup() {
        let ctx = context(FakeApi::default(), MockServersRepository::new());
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(UpdateAction::FetchIdentity { mount: 4 }, tx.clone(), &ctx);
        assert_eq!(ctx.pending_for(4), 1);

        handle_action(UpdateAction::AbortMount { mount: 4 }, tx, &ctx);

        assert_eq!(ctx.pending_for(4), 0);
        assert!(next_message(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn test_selector_tags_request_is_aborted_with_its_mount() {
        let ctx = context(
            FakeApi {
                slow_tags: true,
                ..FakeApi::default()
            },
            MockServersRepository::new(),
        );
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::FetchTags {
                server: server(),
                mount: Some(9),
            },
            tx.clone(),
            &ctx,
        );
        assert_eq!(ctx.pending_for(9), 1);

        handle_action(UpdateAction::AbortMount { mount: 9 }, tx, &ctx);

        assert_eq!(ctx.pending_for(9), 0);
        assert!(next_message(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn test_tags_response_carries_mount() {
        let ctx = context(FakeApi::default(), MockServersRepository::new());
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::FetchTags {
                server: server(),
                mount: Some(3),
            },
            tx,
            &ctx,
        );

        assert!(matches!(
            next_message(&mut rx).await,
            Some(Message::TagsLoaded { mount: Some(3), .. })
        ));
    }

    #[tokio::test]
    async fn test_create_short_url_reports_result() {
        let ctx = context(FakeApi::default(), MockServersRepository::new());
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::CreateShortUrl {
                server: server(),
                data: ShortUrlData {
                    long_url: "https://example.com".to_string(),
                    tags: vec!["foo".to_string()],
                    title: None,
                },
            },
            tx,
            &ctx,
        );

        match next_message(&mut rx).await {
            Some(Message::ShortUrlCreated {
                server_id,
                short_url,
            }) => {
                assert_eq!(server_id.as_str(), "a");
                assert_eq!(short_url.long_url, "https://example.com");
                assert_eq!(short_url.tags, vec!["foo".to_string()]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sign_out_without_endpoint_is_noop() {
        let ctx = context(FakeApi::default(), MockServersRepository::new());
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(UpdateAction::SignOut, tx, &ctx);

        assert!(next_message(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn test_newer_release_is_announced() {
        let ctx = context(FakeApi::default(), MockServersRepository::new());
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::CheckForUpdate {
                url: Url::parse("https://releases.test/latest.json").unwrap(),
            },
            tx,
            &ctx,
        );

        assert!(matches!(
            next_message(&mut rx).await,
            Some(Message::AppUpdateAvailable { version }) if version == "999.0.0"
        ));
    }

    #[tokio::test]
    async fn test_save_servers_uses_repository() {
        let mut repo = MockServersRepository::new();
        repo.expect_save()
            .withf(|servers: &ServersMap| servers.is_empty())
            .times(1)
            .returning(|_| Ok(()));
        let ctx = context(FakeApi::default(), repo);
        let (tx, _rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::SaveServers {
                servers: ServersMap::new(),
            },
            tx,
            &ctx,
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_reload_reads_servers_and_settings() {
        let mut repo = MockServersRepository::new();
        repo.expect_load().returning(|| Ok(ServersMap::new()));
        let dir = tempfile::tempdir().unwrap();
        let ctx = ActionContext::new(
            Arc::new(FakeApi::default()),
            Arc::new(SlowIdentity),
            Arc::new(repo),
            dir.path().to_path_buf(),
        );
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(UpdateAction::ReloadFromDisk, tx, &ctx);

        match next_message(&mut rx).await {
            Some(Message::Reloaded { servers, settings }) => {
                assert!(servers.is_empty());
                assert_eq!(settings, Settings::default());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("0.4.0", "0.3.0"));
        assert!(is_newer("v1.0.0", "0.3.9"));
        assert!(!is_newer("0.3.0", "0.3.0"));
        assert!(!is_newer("garbage", "0.3.0"));
    }
}
