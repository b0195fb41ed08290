//! Main TUI runner - startup and event loop
//!
//! - `run`: builds the store and component tree, then drives the terminal
//! - `bootstrap`: everything up to the first frame, usable without a terminal
//! - `run_loop`: drains messages, re-renders dirty components and polls keys

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use shlink_app::config::{
    load_settings, system_preferred_theme, ServersRepository, TomlServersRepository,
};
use shlink_app::container::Container;
use shlink_app::handler::UpdateAction;
use shlink_app::{
    ActionContext, AppState, HttpIdentityProvider, HttpShlinkApi, Message, Store,
};
use shlink_core::prelude::*;

use crate::component::{Component, Context, Service};
use crate::components::{provide_components, resolve_app};
use crate::event::{self, TerminalEvent};
use crate::terminal;

/// Capacity of the message channel shared by components and background tasks
const MESSAGE_BUFFER: usize = 256;

pub type ConsoleStore = Store<HttpShlinkApi, HttpIdentityProvider>;

/// Options of one console session
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding `config.toml` and `servers.toml`
    pub config_dir: PathBuf,
    /// Path opened at startup
    pub initial_path: String,
}

/// Store, message receiver and root component ready for the first frame
pub struct Session {
    pub store: ConsoleStore,
    pub msg_rx: mpsc::Receiver<Message>,
    pub root: Arc<dyn Component>,
}

/// Load configuration, wire services and components, and queue the startup work.
/// Must run inside a tokio runtime.
pub fn bootstrap(config: &RunConfig) -> Result<Session> {
    let settings = load_settings(&config.config_dir);
    let repo = TomlServersRepository::new(&config.config_dir);
    let servers = repo.load().unwrap_or_else(|e| {
        warn!("Could not load servers from {:?}: {}", repo.path(), e);
        Default::default()
    });
    info!(
        "Loaded {} server(s) from {:?}",
        servers.len(),
        config.config_dir
    );

    let connection = settings.connection.clone();
    let ctx = ActionContext::new(
        Arc::new(HttpShlinkApi::new(connection.request_timeout_ms)),
        Arc::new(HttpIdentityProvider::new(
            connection.identity_base_url.clone(),
            connection.request_timeout_ms,
        )),
        Arc::new(repo),
        config.config_dir.clone(),
    );

    let no_servers = servers.is_empty();
    let state = AppState::new(servers, settings).with_system_theme(system_preferred_theme());
    let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_BUFFER);
    let mut store = Store::new(state, msg_tx, ctx);

    // Fail before the terminal is touched if the tree is miswired
    let mut container: Container<Service> = Container::new();
    provide_components(&mut container);
    container.validate()?;
    let root = resolve_app(&container)?;

    store.dispatch(Message::Navigate(config.initial_path.clone()));
    if no_servers {
        store.dispatch(Message::FetchServers);
    }
    if let Some(url) = connection.update_check_url {
        store.run(UpdateAction::CheckForUpdate { url });
    }

    let dispatcher = store.dispatcher();
    root.mount(&Context::new(store.state(), &dispatcher));

    Ok(Session {
        store,
        msg_rx,
        root,
    })
}

/// Run the console until the user quits
pub async fn run(config: RunConfig) -> Result<()> {
    let session = bootstrap(&config)?;

    terminal::install_panic_hook();
    let mut term = ratatui::init();
    let result = run_loop(&mut term, session);
    ratatui::restore();

    result
}

fn run_loop(terminal: &mut ratatui::DefaultTerminal, session: Session) -> Result<()> {
    let Session {
        mut store,
        mut msg_rx,
        root,
    } = session;
    let dispatcher = store.dispatcher();
    let mut dirty = true;

    while !store.should_quit() {
        while let Ok(message) = msg_rx.try_recv() {
            if drain_one(&mut store, root.as_ref(), message) {
                dirty = true;
            }
        }
        if store.should_quit() {
            break;
        }

        if dirty || root.should_render(store.state()) {
            let ctx = Context::new(store.state(), &dispatcher);
            terminal
                .draw(|frame| root.render(&ctx, frame.area(), frame.buffer_mut()))
                .map_err(|e| Error::terminal(e.to_string()))?;
            dirty = false;
        }

        match event::poll()? {
            TerminalEvent::Key(key) => {
                let ctx = Context::new(store.state(), &dispatcher);
                if !root.handle_key(&ctx, key) {
                    trace!("Unhandled key {:?}", key);
                }
            }
            TerminalEvent::Resize => dirty = true,
            TerminalEvent::Idle => {}
        }
    }

    root.unmount(&Context::new(store.state(), &dispatcher));
    info!("Shlink Console exiting");
    Ok(())
}

/// Dispatch `message` and let mounted components react. Returns whether any
/// slice changed.
fn drain_one(store: &mut ConsoleStore, root: &dyn Component, message: Message) -> bool {
    let changed = store.dispatch(message);
    if changed.is_empty() {
        return false;
    }
    debug!("State changed: {:?}", changed);
    let dispatcher = store.dispatcher();
    root.sync(&Context::new(store.state(), &dispatcher));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use shlink_app::router::Route;
    use tempfile::tempdir;

    const SERVERS_TOML: &str = r#"
[[servers]]
id = "abc123"
name = "Production"
url = "https://s.example.com"
api_key = "secret"
"#;

    fn config(dir: &std::path::Path, path: &str) -> RunConfig {
        RunConfig {
            config_dir: dir.to_path_buf(),
            initial_path: path.to_string(),
        }
    }

    #[tokio::test]
    async fn test_bootstrap_without_config_opens_home() {
        let dir = tempdir().expect("tempdir");
        let session = bootstrap(&config(dir.path(), "/")).expect("bootstrap");

        assert!(session.store.state().servers.is_empty());
        assert_eq!(session.store.state().ui.route, Route::Home);
    }

    #[tokio::test]
    async fn test_bootstrap_loads_servers_and_unknown_path() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("servers.toml"), SERVERS_TOML).expect("write");

        let session = bootstrap(&config(dir.path(), "/nowhere")).expect("bootstrap");

        assert_eq!(session.store.state().servers.len(), 1);
        assert_eq!(session.store.state().ui.route, Route::NotFound);
    }

    #[tokio::test]
    async fn test_drain_one_syncs_on_change() {
        let dir = tempdir().expect("tempdir");
        let mut session = bootstrap(&config(dir.path(), "/")).expect("bootstrap");

        assert!(drain_one(
            &mut session.store,
            session.root.as_ref(),
            Message::Navigate("/settings".to_string())
        ));
        assert_eq!(session.store.state().ui.route, Route::Settings);

        assert!(!drain_one(
            &mut session.store,
            session.root.as_ref(),
            Message::Tick
        ));
    }
}
