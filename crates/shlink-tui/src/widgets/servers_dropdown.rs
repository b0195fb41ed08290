//! Server switcher opened from the header

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, List, ListItem, ListState, StatefulWidget, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::router::server_path;
use shlink_app::state::StateKey;

use crate::component::{Scope, View};
use crate::layout;
use crate::theme::styles;

pub struct ServersDropdown;

impl ServersDropdown {
    pub fn connection() -> Connect {
        connect(
            &[StateKey::Servers, StateKey::SelectedServer, StateKey::Ui],
            &[ActionKey::ToggleServersDropdown, ActionKey::Navigate],
        )
    }

    fn highlighted(scope: &Scope<'_>) -> Option<usize> {
        scope.props.ui.as_ref().and_then(|ui| ui.servers_dropdown)
    }

    /// Popup area below the header it was opened from
    pub fn area(header: Rect, servers: usize) -> Rect {
        layout::dropdown(header, 40, servers as u16 + 2)
    }
}

impl View for ServersDropdown {
    fn name(&self) -> &'static str {
        "ServersDropdown"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let (Some(servers), Some(highlighted)) = (scope.props.servers.as_ref(), Self::highlighted(scope))
        else {
            return;
        };
        let p = scope.palette;
        let current = scope.props.selected_server.as_ref().and_then(|s| s.id().cloned());

        let items: Vec<ListItem> = servers
            .values()
            .map(|server| {
                let marker = if current.as_ref() == Some(&server.id) { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, styles::success(p)),
                    Span::styled(server.name.clone(), styles::text(p)),
                ]))
            })
            .collect();

        Clear.render(area, buf);
        let list = List::new(items)
            .block(styles::popup(p, " Servers "))
            .highlight_style(styles::selected(p));
        let mut state = ListState::default().with_selected(Some(highlighted));
        StatefulWidget::render(list, area, buf, &mut state);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let Some(highlighted) = Self::highlighted(scope) else {
            return false;
        };
        let actions = &scope.props.actions;
        match key {
            InputKey::Up | InputKey::Char('k') => actions.move_servers_dropdown(-1),
            InputKey::Down | InputKey::Char('j') => actions.move_servers_dropdown(1),
            InputKey::Enter => {
                let target = scope
                    .props
                    .servers
                    .as_ref()
                    .and_then(|s| s.keys().nth(highlighted).cloned());
                match target {
                    Some(id) => actions.navigate(server_path(&id)),
                    None => actions.toggle_servers_dropdown(),
                }
            }
            InputKey::Esc | InputKey::Char('w') => actions.toggle_servers_dropdown(),
            // Swallow everything else while open
            _ => true,
        }
    }
}
