//! Table of registered servers with add, edit and delete

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::router::server_path;
use shlink_app::state::StateKey;
use shlink_core::{Reachability, ServerId};

use crate::component::{Scope, View};
use crate::theme::{styles, Palette};

pub struct ManageServers;

impl ManageServers {
    pub fn connection() -> Connect {
        connect(
            &[StateKey::Servers, StateKey::Ui],
            &[
                ActionKey::MoveCursor,
                ActionKey::Navigate,
                ActionKey::OpenCreateServer,
                ActionKey::OpenEditServer,
                ActionKey::DeleteServer,
            ],
        )
    }

    fn server_under_cursor(scope: &Scope<'_>) -> Option<ServerId> {
        let cursor = scope.props.ui.as_ref().map(|ui| ui.cursor).unwrap_or(0);
        scope
            .props
            .servers
            .as_ref()
            .and_then(|s| s.keys().nth(cursor).cloned())
    }

    fn status_cell(p: &Palette, reachability: Reachability) -> Cell<'static> {
        let style = match reachability {
            Reachability::Reachable => styles::success(p),
            Reachability::NotReachable | Reachability::NotFound => styles::error(p),
            Reachability::Unchecked => styles::text_muted(p),
        };
        Cell::from(reachability.label()).style(style)
    }
}

impl View for ManageServers {
    fn name(&self) -> &'static str {
        "ManageServers"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let block = styles::panel(p, true).title(" Manage servers ");
        let inner = block.inner(area);
        block.render(area, buf);

        let [table_area, hints_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let servers = scope.props.servers.clone().unwrap_or_default();
        if servers.is_empty() {
            super::render_message(
                vec![Line::styled("No servers found.", styles::text_muted(p))],
                table_area,
                buf,
            );
        } else {
            let header = Row::new(["Name", "Base URL", "Status"]).style(styles::accent_bold(p));
            let rows = servers.values().map(|server| {
                Row::new(vec![
                    Cell::from(server.name.clone()).style(styles::text(p)),
                    Cell::from(server.url.to_string()).style(styles::text_secondary(p)),
                    Self::status_cell(p, server.reachability),
                ])
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(35),
                    Constraint::Percentage(45),
                    Constraint::Percentage(20),
                ],
            )
            .header(header)
            .row_highlight_style(styles::selected(p));

            let cursor = scope.props.ui.as_ref().map(|ui| ui.cursor).unwrap_or(0);
            let mut state = TableState::default().with_selected(Some(cursor));
            StatefulWidget::render(table, table_area, buf, &mut state);
        }

        let mut hints = styles::hint(p, "n", "Add");
        hints.extend(styles::hint(p, "e", "Edit"));
        hints.extend(styles::hint(p, "D", "Remove"));
        hints.extend(styles::hint(p, "Enter", "Open"));
        hints.extend(styles::hint(p, "g", "Home"));
        Paragraph::new(Line::from(hints)).render(hints_area, buf);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let actions = &scope.props.actions;
        match key {
            InputKey::Up | InputKey::Char('k') => actions.move_cursor(-1),
            InputKey::Down | InputKey::Char('j') => actions.move_cursor(1),
            InputKey::Char('n') => actions.open_create_server(),
            InputKey::Char('e') => Self::server_under_cursor(scope)
                .map(|id| actions.open_edit_server(id))
                .unwrap_or(false),
            InputKey::Char('D') => Self::server_under_cursor(scope)
                .map(|id| actions.delete_server(id))
                .unwrap_or(false),
            InputKey::Enter => Self::server_under_cursor(scope)
                .map(|id| actions.navigate(server_path(&id)))
                .unwrap_or(false),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{drain, press, props_with_actions, servers, TestTerminal};
    use shlink_app::connect::OwnProps;
    use shlink_app::message::Message;
    use shlink_app::state::{mutate, AppState};

    fn state() -> AppState {
        let mut list = servers(&["a", "b"]);
        if let Some(server) = list.get_mut(&ServerId::new("b")) {
            server.reachability = Reachability::NotReachable;
        }
        let mut state = AppState::new(list, Default::default());
        mutate(&mut state.ui, |ui| ui.cursor = 1);
        state
    }

    #[test]
    fn test_renders_servers_with_status() {
        let mut term = TestTerminal::with_size(100, 12);
        let (props, _rx) =
            props_with_actions(&ManageServers::connection(), &state(), OwnProps::default());
        term.render_view(&ManageServers, props);

        assert!(term.buffer_contains("Manage servers"));
        assert!(term.buffer_contains("Server b"));
        assert!(term.buffer_contains("not reachable"));
        assert!(term.buffer_contains("unchecked"));
    }

    #[test]
    fn test_keys_act_on_server_under_cursor() {
        let (props, mut rx) =
            props_with_actions(&ManageServers::connection(), &state(), OwnProps::default());

        assert!(press(&ManageServers, props.clone(), InputKey::Char('e')));
        assert!(press(&ManageServers, props.clone(), InputKey::Char('D')));
        assert!(press(&ManageServers, props, InputKey::Char('n')));

        let sent = drain(&mut rx);
        assert!(matches!(&sent[0], Message::OpenEditServer(id) if id.as_str() == "b"));
        assert!(matches!(&sent[1], Message::DeleteServer(id) if id.as_str() == "b"));
        assert!(matches!(sent[2], Message::OpenCreateServer));
    }

    #[test]
    fn test_empty_list() {
        let mut term = TestTerminal::new();
        let (props, _rx) = props_with_actions(
            &ManageServers::connection(),
            &AppState::default(),
            OwnProps::default(),
        );
        term.render_view(&ManageServers, props.clone());

        assert!(term.buffer_contains("No servers found."));
        assert!(!press(&ManageServers, props, InputKey::Char('D')));
    }
}
