//! Landing view: registered servers, or a welcome message when there are none

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::router::server_path;
use shlink_app::state::StateKey;

use crate::component::{Scope, View};
use crate::theme::styles;

pub struct Home;

impl Home {
    pub fn connection() -> Connect {
        connect(
            &[StateKey::Servers, StateKey::Ui],
            &[ActionKey::MoveCursor, ActionKey::Navigate, ActionKey::FetchServers],
        )
    }

    fn cursor(scope: &Scope<'_>) -> usize {
        scope.props.ui.as_ref().map(|ui| ui.cursor).unwrap_or(0)
    }

    fn render_welcome(scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let mut hints = styles::hint(p, "n", "Add a server");
        hints.extend(styles::hint(p, "r", "Load remote servers"));
        let lines = vec![
            Line::styled("Welcome!", styles::brand(p)),
            Line::raw(""),
            Line::styled(
                "This application will help you manage your Shlink servers.",
                styles::text(p),
            ),
            Line::raw(""),
            Line::from(hints),
        ];
        super::render_message(lines, area, buf);
    }
}

impl View for Home {
    fn name(&self) -> &'static str {
        "Home"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let servers = match scope.props.servers.as_ref() {
            Some(servers) if !servers.is_empty() => servers,
            _ => return Self::render_welcome(scope, area, buf),
        };

        let block = styles::panel(p, true).title(" Select a server ");
        let inner = block.inner(area);
        block.render(area, buf);

        let [list_area, hints_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let name_width = inner.width as usize / 3;
        let items: Vec<ListItem> = servers
            .values()
            .map(|server| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<name_width$}", super::truncate(&server.name, name_width)),
                        styles::text(p),
                    ),
                    Span::styled(server.url.to_string(), styles::text_muted(p)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(styles::selected(p))
            .highlight_symbol("› ");
        let mut state = ListState::default().with_selected(Some(Self::cursor(scope)));
        StatefulWidget::render(list, list_area, buf, &mut state);

        let mut hints = styles::hint(p, "Enter", "Open");
        hints.extend(styles::hint(p, "n", "Add"));
        hints.extend(styles::hint(p, "M", "Manage servers"));
        hints.extend(styles::hint(p, "q", "Quit"));
        Paragraph::new(Line::from(hints)).render(hints_area, buf);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let actions = &scope.props.actions;
        match key {
            InputKey::Up | InputKey::Char('k') => actions.move_cursor(-1),
            InputKey::Down | InputKey::Char('j') => actions.move_cursor(1),
            InputKey::Enter => {
                let target = scope
                    .props
                    .servers
                    .as_ref()
                    .and_then(|s| s.keys().nth(Self::cursor(scope)).cloned());
                target.map(|id| actions.navigate(server_path(&id))).unwrap_or(false)
            }
            InputKey::Char('n') => actions.navigate("/server/create"),
            InputKey::Char('r') => actions.fetch_servers(),
            _ => false,
        }
    }
}
