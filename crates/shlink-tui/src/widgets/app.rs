//! Root view: screen layout, routed body and global keys

use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use shlink_app::connect::{connect, ActionKey, Connect, OwnProps};
use shlink_app::input_key::InputKey;
use shlink_app::router::Route;
use shlink_app::state::StateKey;

use crate::component::{Component, MountSlot, Scope, View};
use crate::layout;

use super::ServersDropdown;

/// Top-level screens; one component is mounted per screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Home,
    ManageServers,
    ServerForm,
    Settings,
    Server,
    NotFound,
}

impl Screen {
    fn for_route(route: &Route) -> Self {
        match route {
            Route::Home => Screen::Home,
            Route::ManageServers => Screen::ManageServers,
            Route::CreateServer | Route::EditServer(_) => Screen::ServerForm,
            Route::Settings => Screen::Settings,
            Route::Server { .. } => Screen::Server,
            Route::NotFound => Screen::NotFound,
        }
    }
}

/// Components the root view is built from
pub struct AppParts {
    pub header: Arc<dyn Component>,
    pub banner: Arc<dyn Component>,
    pub footer: Arc<dyn Component>,
    pub dropdown: Arc<dyn Component>,
    pub home: Arc<dyn Component>,
    pub manage_servers: Arc<dyn Component>,
    pub server_form: Arc<dyn Component>,
    pub settings: Arc<dyn Component>,
    pub server: Arc<dyn Component>,
    pub not_found: Arc<dyn Component>,
}

pub struct App {
    parts: AppParts,
    screen: MountSlot<Screen>,
    dropdown: MountSlot<()>,
}

impl App {
    pub fn new(parts: AppParts) -> Self {
        Self {
            parts,
            screen: MountSlot::new(),
            dropdown: MountSlot::new(),
        }
    }

    pub fn connection() -> Connect {
        connect(
            &[StateKey::Ui, StateKey::Servers, StateKey::AppUpdated],
            &[
                ActionKey::Navigate,
                ActionKey::Quit,
                ActionKey::SignOut,
                ActionKey::ToggleServersDropdown,
                ActionKey::DismissNotice,
            ],
        )
    }

    fn screen_component(&self, screen: Screen) -> Arc<dyn Component> {
        let parts = &self.parts;
        match screen {
            Screen::Home => parts.home.clone(),
            Screen::ManageServers => parts.manage_servers.clone(),
            Screen::ServerForm => parts.server_form.clone(),
            Screen::Settings => parts.settings.clone(),
            Screen::Server => parts.server.clone(),
            Screen::NotFound => parts.not_found.clone(),
        }
    }

    fn fixed(&self) -> [&Arc<dyn Component>; 3] {
        [&self.parts.header, &self.parts.banner, &self.parts.footer]
    }
}

impl View for App {
    fn name(&self) -> &'static str {
        "App"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        Block::default()
            .style(Style::default().bg(scope.palette.background))
            .render(area, buf);

        let update = scope
            .props
            .app_updated
            .as_ref()
            .map(|u| u.available)
            .unwrap_or(false);
        let areas = layout::create(area, update);

        let own = OwnProps::default;
        scope.render_child(self.parts.header.as_ref(), own(), areas.header, buf);
        scope.render_child(self.parts.banner.as_ref(), own(), areas.banner, buf);
        if let Some(screen) = self.screen.current() {
            scope.render_child(screen.as_ref(), own(), areas.body, buf);
        }
        scope.render_child(self.parts.footer.as_ref(), own(), areas.footer, buf);

        if let Some(dropdown) = self.dropdown.current() {
            let popup = ServersDropdown::area(areas.header, scope.props.servers_count());
            let popup = popup.intersection(area);
            scope.render_child(dropdown.as_ref(), own(), popup, buf);
        }
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let actions = &scope.props.actions;
        if key.is_interrupt() {
            return actions.quit();
        }
        if let Some(dropdown) = self.dropdown.current() {
            return scope.child_key(dropdown.as_ref(), key);
        }
        if let Some(screen) = self.screen.current() {
            if scope.child_key(screen.as_ref(), key) {
                return true;
            }
        }
        if scope.child_key(self.parts.banner.as_ref(), key) {
            return true;
        }

        let has_notice = scope
            .props
            .ui
            .as_ref()
            .map(|ui| ui.notice.is_some())
            .unwrap_or(false);
        match key {
            InputKey::Char('q') => actions.quit(),
            InputKey::Char('g') => actions.navigate("/"),
            InputKey::Char('S') => actions.navigate("/settings"),
            InputKey::Char('M') => actions.navigate("/manage-servers"),
            InputKey::Char('w') => actions.toggle_servers_dropdown(),
            InputKey::Char('O') => actions.sign_out(),
            InputKey::Esc if has_notice => actions.dismiss_notice(),
            _ => false,
        }
    }

    fn on_mount(&self, scope: &Scope<'_>) {
        for child in self.fixed() {
            scope.mount_child(child.as_ref());
        }
        self.on_update(scope);
    }

    fn on_update(&self, scope: &Scope<'_>) {
        let Some(ui) = scope.props.ui.as_ref() else {
            return;
        };
        let screen = Screen::for_route(&ui.route);
        self.screen
            .sync(scope, Some((screen, self.screen_component(screen))));
        let dropdown = ui
            .servers_dropdown
            .map(|_| ((), self.parts.dropdown.clone()));
        self.dropdown.sync(scope, dropdown);

        for child in self.children() {
            scope.sync_child(child.as_ref());
        }
    }

    fn on_unmount(&self, scope: &Scope<'_>) {
        self.dropdown.clear(scope);
        self.screen.clear(scope);
        for child in self.fixed() {
            scope.unmount_child(child.as_ref());
        }
    }

    fn children(&self) -> Vec<Arc<dyn Component>> {
        let mut children: Vec<Arc<dyn Component>> =
            self.fixed().into_iter().cloned().collect();
        children.extend(self.screen.current());
        children.extend(self.dropdown.current());
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Connected, Context};
    use crate::test_utils::{drain, servers, TestTerminal};
    use ratatui::widgets::Paragraph;
    use shlink_app::connect::Dispatcher;
    use shlink_app::message::Message;
    use shlink_app::state::{mutate, AppState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct Stub {
        label: &'static str,
        mounts: AtomicUsize,
        /// Consumes this key when set
        grabs: Option<char>,
    }

    impl View for Stub {
        fn name(&self) -> &'static str {
            self.label
        }

        fn render(&self, _scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
            Paragraph::new(self.label).render(area, buf);
        }

        fn handle_key(&self, _scope: &Scope<'_>, key: InputKey) -> bool {
            matches!((key, self.grabs), (InputKey::Char(c), Some(g)) if c == g)
        }

        fn on_mount(&self, _scope: &Scope<'_>) {
            self.mounts.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn stub(label: &'static str) -> (Arc<Stub>, Arc<dyn Component>) {
        let grabs = (label == "FORM").then_some('q');
        let view = Arc::new(Stub {
            label,
            grabs,
            ..Stub::default()
        });
        let component: Arc<dyn Component> =
            Arc::new(Connected::new(connect(&[StateKey::Ui], &[]), view.clone()));
        (view, component)
    }

    struct Fixture {
        app: Connected,
        home: Arc<Stub>,
        header: Arc<Stub>,
    }

    fn fixture() -> Fixture {
        let (header, header_c) = stub("HEADER");
        let (home, home_c) = stub("HOME");
        let parts = AppParts {
            header: header_c,
            banner: stub("BANNER").1,
            footer: stub("FOOTER").1,
            dropdown: stub("DROPDOWN").1,
            home: home_c,
            manage_servers: stub("MANAGE").1,
            server_form: stub("FORM").1,
            settings: stub("SETTINGS").1,
            server: stub("SERVER").1,
            not_found: stub("NOT_FOUND").1,
        };
        Fixture {
            app: Connected::new(App::connection(), Arc::new(App::new(parts))),
            home,
            header,
        }
    }

    fn with(state: &AppState, f: impl FnOnce(&Context<'_>)) -> Vec<Message> {
        let (tx, mut rx) = mpsc::channel(16);
        let dispatcher = Dispatcher::new(tx);
        f(&Context::new(state, &dispatcher));
        drain(&mut rx)
    }

    #[test]
    fn test_mount_mounts_fixed_children_and_route() {
        let f = fixture();
        let state = AppState::default();
        with(&state, |ctx| f.app.mount(ctx));

        assert_eq!(f.header.mounts.load(Ordering::SeqCst), 1);
        assert_eq!(f.home.mounts.load(Ordering::SeqCst), 1);

        let mut term = TestTerminal::new();
        term.render_component(&f.app, &state);
        assert!(term.buffer_contains("HEADER"));
        assert!(term.buffer_contains("HOME"));
        assert!(term.buffer_contains("FOOTER"));
    }

    #[test]
    fn test_route_change_swaps_screen() {
        let f = fixture();
        let mut state = AppState::default();
        with(&state, |ctx| f.app.mount(ctx));

        mutate(&mut state.ui, |ui| ui.route = Route::Settings);
        with(&state, |ctx| f.app.sync(ctx));

        let mut term = TestTerminal::new();
        term.render_component(&f.app, &state);
        assert!(term.buffer_contains("SETTINGS"));
        assert!(!term.buffer_contains("HOME"));
    }

    #[test]
    fn test_global_keys() {
        let f = fixture();
        let state = AppState::default();
        with(&state, |ctx| f.app.mount(ctx));

        let sent = with(&state, |ctx| {
            assert!(f.app.handle_key(ctx, InputKey::Char('S')));
            assert!(f.app.handle_key(ctx, InputKey::Char('q')));
            assert!(f.app.handle_key(ctx, InputKey::CharCtrl('c')));
            assert!(!f.app.handle_key(ctx, InputKey::Char('z')));
        });

        assert!(matches!(&sent[0], Message::Navigate(p) if p == "/settings"));
        assert!(matches!(sent[1], Message::Quit));
        assert!(matches!(sent[2], Message::Quit));
    }

    #[test]
    fn test_screen_gets_keys_first() {
        let f = fixture();
        let mut state = AppState::default();
        mutate(&mut state.ui, |ui| ui.route = Route::CreateServer);
        with(&state, |ctx| f.app.mount(ctx));

        let sent = with(&state, |ctx| {
            assert!(f.app.handle_key(ctx, InputKey::Char('q')));
        });
        assert!(sent.is_empty());
    }

    #[test]
    fn test_open_dropdown_captures_keys() {
        let f = fixture();
        let mut state = AppState::new(servers(&["a", "b"]), Default::default());
        mutate(&mut state.ui, |ui| ui.servers_dropdown = Some(0));
        with(&state, |ctx| f.app.mount(ctx));

        let sent = with(&state, |ctx| {
            assert!(!f.app.handle_key(ctx, InputKey::Char('q')));
        });
        assert!(sent.is_empty());
    }

    #[test]
    fn test_should_render_follows_children() {
        let f = fixture();
        let mut state = AppState::default();
        with(&state, |ctx| f.app.mount(ctx));
        let mut term = TestTerminal::new();
        term.render_component(&f.app, &state);
        assert!(!f.app.should_render(&state));

        mutate(&mut state.settings, |_| {});
        assert!(!f.app.should_render(&state));

        mutate(&mut state.ui, |ui| ui.cursor = 3);
        assert!(f.app.should_render(&state));
    }
}
