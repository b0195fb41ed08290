//! Header bar: brand, active server, signed-in user and switcher hint
//!
//! The header owns the identity lookup: mounting it starts a lookup under a
//! fresh mount token, unmounting releases the token so a late answer is
//! dropped instead of touching a header that is gone.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::state::StateKey;
use shlink_core::SelectedServer;

use crate::component::{Scope, View};
use crate::theme::styles;

pub struct MainHeader;

impl MainHeader {
    pub fn connection() -> Connect {
        connect(
            &[
                StateKey::Servers,
                StateKey::SelectedServer,
                StateKey::Identity,
            ],
            &[ActionKey::FetchIdentity, ActionKey::ReleaseIdentity],
        )
    }

    fn server_name(selected: Option<&SelectedServer>) -> Option<String> {
        match selected? {
            SelectedServer::Reachable { server, .. } | SelectedServer::NotReachable(server) => {
                Some(server.name.clone())
            }
            SelectedServer::Checking(id) | SelectedServer::NotFound(id) => Some(id.to_string()),
            SelectedServer::None => None,
        }
    }
}

impl View for MainHeader {
    fn name(&self) -> &'static str {
        "MainHeader"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let block = styles::panel(p, false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut left = vec![Span::raw(" "), Span::styled("Shlink", styles::brand(p))];
        if let Some(name) = Self::server_name(scope.props.selected_server.as_deref()) {
            left.push(Span::styled(" / ", styles::text_muted(p)));
            left.push(Span::styled(name, styles::text_secondary(p)));
        }
        Paragraph::new(Line::from(left)).render(inner, buf);

        let identity = scope
            .props
            .identity
            .as_ref()
            .map(|i| i.identity.display().to_string())
            .unwrap_or_default();

        let mut right = Vec::new();
        if scope.props.servers_count() > 1 {
            right.extend(styles::hint(p, "w", "Servers"));
        }
        right.extend(styles::hint(p, "S", "Settings"));
        right.push(Span::styled("● ", styles::success(p)));
        right.push(Span::styled(identity, styles::text(p)));
        right.push(Span::raw("  "));
        right.extend(styles::hint(p, "O", "Sign out"));

        let right = Line::from(right);
        let width = (right.width() as u16).min(inner.width);
        let right_area = Rect {
            x: inner.x + inner.width - width,
            width,
            ..inner
        };
        Paragraph::new(right).render(right_area, buf);
    }

    fn on_mount(&self, scope: &Scope<'_>) {
        scope.props.actions.fetch_identity();
    }

    fn on_unmount(&self, scope: &Scope<'_>) {
        scope.props.actions.release_identity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Connected, Context};
    use crate::test_utils::{reachable, servers, TestTerminal};
    use shlink_app::connect::Dispatcher;
    use shlink_app::message::Message;
    use shlink_app::state::{mutate, AppState, Identity};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn state(ids: &[&str]) -> AppState {
        let mut state = AppState::new(servers(ids), Default::default());
        state.selected_server = Arc::new(reachable("a", "3.0.0"));
        mutate(&mut state.identity, |i| {
            i.identity = Identity::Email("jane@example.com".to_string())
        });
        state
    }

    #[test]
    fn test_renders_brand_server_and_identity() {
        let header = Connected::new(MainHeader::connection(), Arc::new(MainHeader));
        let mut term = TestTerminal::with_size(120, 3);
        term.render_component(&header, &state(&["a", "b"]));

        assert!(term.buffer_contains("Shlink"));
        assert!(term.buffer_contains("Server a"));
        assert!(term.buffer_contains("jane@example.com"));
        assert!(term.buffer_contains("[w] Servers"));
    }

    #[test]
    fn test_switcher_hint_needs_two_servers() {
        let header = Connected::new(MainHeader::connection(), Arc::new(MainHeader));
        let mut term = TestTerminal::with_size(120, 3);
        term.render_component(&header, &state(&["a"]));

        assert!(!term.buffer_contains("[w] Servers"));
    }

    #[test]
    fn test_mount_lifecycle_drives_identity() {
        let header = Connected::new(MainHeader::connection(), Arc::new(MainHeader));
        let state = AppState::default();
        let (tx, mut rx) = mpsc::channel(4);
        let dispatcher = Dispatcher::new(tx);
        let ctx = Context::new(&state, &dispatcher);

        header.mount(&ctx);
        header.unmount(&ctx);

        assert!(matches!(rx.try_recv(), Ok(Message::FetchIdentity)));
        assert!(matches!(rx.try_recv(), Ok(Message::ReleaseIdentity)));
    }
}
