//! Test utilities for rendering components without a terminal

use ratatui::backend::{Backend, TestBackend};
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::Terminal;
use tokio::sync::mpsc;

use shlink_app::connect::{BoundActions, Connect, Dispatcher, OwnProps, Props};
use shlink_app::message::Message;
use shlink_app::state::AppState;
use shlink_core::{printable_version, SelectedServer, Server, ServerId, ServersMap};

use crate::component::{Component, Context, Scope, View};
use crate::theme::palette::DARK;

/// Terminal over an in-memory backend
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    /// Standard 80x24 terminal
    pub fn new() -> Self {
        Self::with_size(80, 24)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.backend().size().expect("backend size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|f| f.render_widget(widget, area))
            .expect("draw");
    }

    /// Render a view with explicit props, detached from any store
    pub fn render_view(&mut self, view: &dyn View, props: Props) {
        let area = self.area();
        self.terminal
            .draw(|f| {
                let scope = Scope::detached(props, &DARK);
                view.render(&scope, area, f.buffer_mut());
            })
            .expect("draw");
    }

    /// Render a connected component against `state`
    pub fn render_component(&mut self, component: &dyn Component, state: &AppState) {
        let area = self.area();
        let dispatcher = Dispatcher::default();
        self.terminal
            .draw(|f| {
                let ctx = Context::new(state, &dispatcher);
                component.render(&ctx, area, f.buffer_mut());
            })
            .expect("draw");
    }

    /// All cells joined row by row
    pub fn content(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        self.content().contains(text)
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Props projected from `state` with every action bound to a fresh channel
pub fn props_with_actions(
    connect: &Connect,
    state: &AppState,
    own: OwnProps,
) -> (Props, mpsc::Receiver<Message>) {
    let (tx, rx) = mpsc::channel(32);
    let dispatcher = Dispatcher::new(tx);
    let props = connect.project(state, &dispatcher, own);
    (props, rx)
}

/// Bound actions for `connect` that report to the returned receiver
pub fn actions_for(connect: &Connect) -> (BoundActions, mpsc::Receiver<Message>) {
    let (tx, rx) = mpsc::channel(32);
    let actions = BoundActions::new(connect.action_keys().iter().copied(), Dispatcher::new(tx));
    (actions, rx)
}

/// Everything queued on `rx` so far
pub fn drain(rx: &mut mpsc::Receiver<Message>) -> Vec<Message> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

/// Handle a key on a view with explicit props
pub fn press(view: &dyn View, props: Props, key: shlink_app::InputKey) -> bool {
    let scope = Scope::detached(props, &DARK);
    view.handle_key(&scope, key)
}

pub fn server(id: &str) -> Server {
    Server::new(
        ServerId::new(id),
        format!("Server {id}"),
        &format!("https://{id}.example.com"),
        "api-key",
    )
    .expect("valid server")
}

pub fn servers(ids: &[&str]) -> ServersMap {
    ids.iter().map(|id| (ServerId::new(*id), server(id))).collect()
}

pub fn reachable(id: &str, version: &str) -> SelectedServer {
    SelectedServer::Reachable {
        server: server(id),
        version: version.to_string(),
        printable_version: printable_version(version),
    }
}
