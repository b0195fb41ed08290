//! Everything below `/server/:id/`
//!
//! Shows the health check outcome of the selected server and, once it is
//! reachable, mounts the section the route points at. The tags selector is
//! mounted per opening: every new selector token remounts it.

use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use shlink_app::connect::{connect, ActionKey, Connect, OwnProps};
use shlink_app::input_key::InputKey;
use shlink_app::router::{server_section_path, Route, ServerSection};
use shlink_app::state::{MountId, StateKey};
use shlink_app::tag_selector::TagsSelectorTarget;
use shlink_core::{SelectedServer, ServerId};

use crate::component::{Component, MountSlot, Scope, View};
use crate::theme::styles;

use super::tags_selector::SELECTOR_HEIGHT;

pub struct ServerView {
    short_urls: Arc<dyn Component>,
    create_short_url: Arc<dyn Component>,
    tags_selector: Arc<dyn Component>,
    tags_list: Arc<dyn Component>,
    section: MountSlot<(ServerId, ServerSection)>,
    selector: MountSlot<MountId>,
}

impl ServerView {
    pub fn new(
        short_urls: Arc<dyn Component>,
        create_short_url: Arc<dyn Component>,
        tags_selector: Arc<dyn Component>,
        tags_list: Arc<dyn Component>,
    ) -> Self {
        Self {
            short_urls,
            create_short_url,
            tags_selector,
            tags_list,
            section: MountSlot::new(),
            selector: MountSlot::new(),
        }
    }

    pub fn connection() -> Connect {
        connect(
            &[StateKey::SelectedServer, StateKey::Ui],
            &[
                ActionKey::Navigate,
                ActionKey::SelectServer,
                ActionKey::OpenTagsSelector,
            ],
        )
    }

    fn section_of(scope: &Scope<'_>) -> ServerSection {
        match scope.props.ui.as_ref().map(|ui| &ui.route) {
            Some(Route::Server { section, .. }) => *section,
            _ => ServerSection::ShortUrls,
        }
    }

    fn reachable_id(scope: &Scope<'_>) -> Option<ServerId> {
        scope
            .props
            .selected_server
            .as_ref()
            .and_then(|s| s.reachable_server())
            .map(|server| server.id.clone())
    }

    fn section_child(&self, section: ServerSection) -> Arc<dyn Component> {
        match section {
            ServerSection::ShortUrls => self.short_urls.clone(),
            ServerSection::CreateShortUrl => self.create_short_url.clone(),
            ServerSection::ManageTags => self.tags_list.clone(),
        }
    }

    fn render_tabs(scope: &Scope<'_>, section: ServerSection, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let mut spans = vec![Span::raw(" ")];
        for (i, tab) in ServerSection::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", styles::text_muted(p)));
            }
            let style = if *tab == section {
                styles::selected(p)
            } else {
                styles::text_secondary(p)
            };
            spans.push(Span::styled(format!(" {} ", tab.label()), style));
        }
        spans.push(Span::styled("   Tab to switch", styles::text_muted(p)));
        let line = Line::from(spans);
        Paragraph::new(line).render(area, buf);
    }

    fn render_status(scope: &Scope<'_>, selected: &SelectedServer, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let lines = match selected {
            SelectedServer::None | SelectedServer::Checking(_) => {
                vec![Line::styled("Checking server...", styles::text_muted(p))]
            }
            SelectedServer::NotFound(_) => vec![
                Line::styled("Could not find this Shlink server.", styles::error(p)),
                Line::raw(""),
                Line::from(styles::hint(p, "g", "Home")),
            ],
            SelectedServer::NotReachable(_) => {
                let mut hints = styles::hint(p, "r", "Retry");
                hints.extend(styles::hint(p, "e", "Edit server"));
                vec![
                    Line::styled("Oops! Could not connect to this Shlink server.", styles::error(p)),
                    Line::styled(
                        "Make sure you have internet connection, and the server is properly configured and on-line.",
                        styles::text_secondary(p),
                    ),
                    Line::raw(""),
                    Line::from(hints),
                ]
            }
            SelectedServer::Reachable { .. } => Vec::new(),
        };
        super::render_message(lines, area, buf);
    }
}

impl View for ServerView {
    fn name(&self) -> &'static str {
        "ServerView"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let Some(selected) = scope.props.selected_server.as_deref() else {
            return;
        };
        if Self::reachable_id(scope).is_none() {
            return Self::render_status(scope, selected, area, buf);
        }

        let section = Self::section_of(scope);
        let [tabs_area, body] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(area);
        Self::render_tabs(scope, section, tabs_area, buf);

        if let Some(child) = self.section.current() {
            scope.render_child(child.as_ref(), OwnProps::default(), body, buf);
        }
        if let Some(selector) = self.selector.current() {
            let overlay = Rect {
                height: SELECTOR_HEIGHT.min(body.height),
                ..body
            };
            scope.render_child(selector.as_ref(), OwnProps::default(), overlay, buf);
        }
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        if let Some(selector) = self.selector.current() {
            return scope.child_key(selector.as_ref(), key);
        }

        let actions = &scope.props.actions;
        let Some(id) = Self::reachable_id(scope) else {
            let not_reachable = match scope.props.selected_server.as_deref() {
                Some(SelectedServer::NotReachable(server)) => Some(server.id.clone()),
                _ => None,
            };
            return match (key, not_reachable) {
                (InputKey::Char('r'), Some(id)) => actions.select_server(id),
                (InputKey::Char('e'), Some(id)) => actions.navigate(format!("/server/{id}/edit")),
                _ => false,
            };
        };

        let section = Self::section_of(scope);
        if let Some(child) = self.section.current() {
            if scope.child_key(child.as_ref(), key) {
                return true;
            }
        }

        match key {
            InputKey::Tab => actions.navigate(server_section_path(&id, section.step(1))),
            InputKey::BackTab => actions.navigate(server_section_path(&id, section.step(-1))),
            InputKey::Char('t') if section == ServerSection::ShortUrls => {
                actions.open_tags_selector(TagsSelectorTarget::Filter)
            }
            InputKey::Char('c') if section == ServerSection::ShortUrls => {
                actions.navigate(server_section_path(&id, ServerSection::CreateShortUrl))
            }
            _ => false,
        }
    }

    fn on_update(&self, scope: &Scope<'_>) {
        let section = Self::section_of(scope);
        let reachable = Self::reachable_id(scope);

        let next_section = reachable
            .clone()
            .map(|id| ((id, section), self.section_child(section)));
        self.section.sync(scope, next_section);

        let token = scope
            .props
            .ui
            .as_ref()
            .and_then(|ui| ui.tags_selector.as_ref())
            .map(|s| s.mount)
            .filter(|_| reachable.is_some() && section != ServerSection::ManageTags);
        self.selector
            .sync(scope, token.map(|mount| (mount, self.tags_selector.clone())));

        for child in self.children() {
            scope.sync_child(child.as_ref());
        }
    }

    fn on_unmount(&self, scope: &Scope<'_>) {
        self.selector.clear(scope);
        self.section.clear(scope);
    }

    fn children(&self) -> Vec<Arc<dyn Component>> {
        self.section
            .current()
            .into_iter()
            .chain(self.selector.current())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Connected, Context};
    use crate::test_utils::{drain, reachable, server, TestTerminal};
    use shlink_app::connect::Dispatcher;
    use shlink_app::message::Message;
    use shlink_app::state::{mutate, AppState};
    use shlink_app::tag_selector::TagsSelectorState;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    /// Child that records its lifecycle and the keys it sees
    #[derive(Default)]
    struct Recorder {
        label: &'static str,
        mounts: AtomicUsize,
        unmounts: AtomicUsize,
    }

    impl View for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        fn render(&self, _scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
            Paragraph::new(self.label).render(area, buf);
        }

        fn on_mount(&self, _scope: &Scope<'_>) {
            self.mounts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_unmount(&self, _scope: &Scope<'_>) {
            self.unmounts.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        view: Arc<ServerView>,
        component: Connected,
        urls: Arc<Recorder>,
        create: Arc<Recorder>,
        selector: Arc<Recorder>,
        tags: Arc<Recorder>,
    }

    fn fixture() -> Fixture {
        let recorder = |label| {
            Arc::new(Recorder {
                label,
                ..Recorder::default()
            })
        };
        let (urls, create, selector, tags) = (
            recorder("URLS"),
            recorder("CREATE"),
            recorder("SELECTOR"),
            recorder("TAGS"),
        );
        let wrap = |r: &Arc<Recorder>| -> Arc<dyn Component> {
            Arc::new(Connected::new(connect(&[StateKey::Ui], &[]), r.clone()))
        };
        let view = Arc::new(ServerView::new(
            wrap(&urls),
            wrap(&create),
            wrap(&selector),
            wrap(&tags),
        ));
        let component = Connected::new(ServerView::connection(), view.clone());
        Fixture {
            view,
            component,
            urls,
            create,
            selector,
            tags,
        }
    }

    fn at(section: ServerSection, selected: SelectedServer) -> AppState {
        let mut state = AppState::default();
        state.selected_server = Arc::new(selected);
        mutate(&mut state.ui, |ui| {
            ui.route = Route::Server {
                id: ServerId::new("a"),
                section,
            }
        });
        state
    }

    fn sync(component: &Connected, state: &AppState) -> Vec<Message> {
        let (tx, mut rx) = mpsc::channel(16);
        let dispatcher = Dispatcher::new(tx);
        component.sync(&Context::new(state, &dispatcher));
        drain(&mut rx)
    }

    #[test]
    fn test_section_mounts_once_reachable() {
        let f = fixture();

        sync(&f.component, &at(ServerSection::ShortUrls, SelectedServer::Checking(ServerId::new("a"))));
        assert_eq!(f.urls.mounts.load(Ordering::SeqCst), 0);

        sync(&f.component, &at(ServerSection::ShortUrls, reachable("a", "3.0.0")));
        assert_eq!(f.urls.mounts.load(Ordering::SeqCst), 1);

        sync(&f.component, &at(ServerSection::ManageTags, reachable("a", "3.0.0")));
        assert_eq!(f.urls.unmounts.load(Ordering::SeqCst), 1);
        assert_eq!(f.tags.mounts.load(Ordering::SeqCst), 1);
        assert_eq!(f.view.children().len(), 1);
    }

    #[test]
    fn test_new_selector_token_remounts_selector() {
        let f = fixture();
        let mut state = at(ServerSection::ShortUrls, reachable("a", "3.0.0"));

        mutate(&mut state.ui, |ui| ui.tags_selector = Some(TagsSelectorState::new(1, vec![])));
        sync(&f.component, &state);
        mutate(&mut state.ui, |ui| ui.tags_selector = Some(TagsSelectorState::new(2, vec![])));
        sync(&f.component, &state);

        assert_eq!(f.selector.mounts.load(Ordering::SeqCst), 2);
        assert_eq!(f.selector.unmounts.load(Ordering::SeqCst), 1);

        mutate(&mut state.ui, |ui| ui.tags_selector = None);
        sync(&f.component, &state);
        assert_eq!(f.selector.unmounts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_status_messages() {
        let f = fixture();
        let mut term = TestTerminal::with_size(120, 12);

        term.render_component(
            &f.component,
            &at(ServerSection::ShortUrls, SelectedServer::NotReachable(server("a"))),
        );
        assert!(term.buffer_contains("Could not connect to this Shlink server"));

        term.render_component(
            &f.component,
            &at(ServerSection::ShortUrls, SelectedServer::NotFound(ServerId::new("a"))),
        );
        assert!(term.buffer_contains("Could not find this Shlink server"));
    }

    #[test]
    fn test_renders_tabs_and_mounted_section() {
        let f = fixture();
        let state = at(ServerSection::ShortUrls, reachable("a", "3.0.0"));
        sync(&f.component, &state);

        let mut term = TestTerminal::new();
        term.render_component(&f.component, &state);

        assert!(term.buffer_contains("List short URLs"));
        assert!(term.buffer_contains("URLS"));
    }

    #[test]
    fn test_tab_switches_section() {
        let f = fixture();
        let state = at(ServerSection::ShortUrls, reachable("a", "3.0.0"));
        sync(&f.component, &state);

        let (tx, mut rx) = mpsc::channel(4);
        let dispatcher = Dispatcher::new(tx);
        assert!(f.component.handle_key(&Context::new(&state, &dispatcher), InputKey::Tab));
        assert!(
            matches!(&drain(&mut rx)[0], Message::Navigate(p) if p == "/server/a/create-short-url")
        );

        let state = at(ServerSection::ShortUrls, reachable("a", "3.0.0"));
        assert!(f.component.handle_key(&Context::new(&state, &dispatcher), InputKey::BackTab));
        assert!(
            matches!(&drain(&mut rx)[0], Message::Navigate(p) if p == "/server/a/manage-tags")
        );
    }

    #[test]
    fn test_create_section_mounts_form_and_keeps_selector() {
        let f = fixture();
        let mut state = at(ServerSection::CreateShortUrl, reachable("a", "3.0.0"));
        sync(&f.component, &state);
        assert_eq!(f.create.mounts.load(Ordering::SeqCst), 1);

        mutate(&mut state.ui, |ui| {
            ui.tags_selector = Some(
                TagsSelectorState::new(3, vec![]).with_target(TagsSelectorTarget::NewShortUrl),
            )
        });
        sync(&f.component, &state);
        assert_eq!(f.selector.mounts.load(Ordering::SeqCst), 1);

        let mut term = TestTerminal::new();
        term.render_component(&f.component, &state);
        assert!(term.buffer_contains("Create short URL"));
    }

    #[test]
    fn test_c_opens_create_section() {
        let f = fixture();
        let state = at(ServerSection::ShortUrls, reachable("a", "3.0.0"));
        sync(&f.component, &state);

        let (tx, mut rx) = mpsc::channel(4);
        let dispatcher = Dispatcher::new(tx);
        assert!(f.component.handle_key(&Context::new(&state, &dispatcher), InputKey::Char('c')));
        assert!(
            matches!(&drain(&mut rx)[0], Message::Navigate(p) if p == "/server/a/create-short-url")
        );
    }
}
