//! Banner announcing a new console release

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::state::StateKey;

use crate::component::{Scope, View};
use crate::theme::styles;

pub struct AppUpdateBanner;

impl AppUpdateBanner {
    pub fn connection() -> Connect {
        connect(
            &[StateKey::AppUpdated],
            &[ActionKey::ResetAppUpdate, ActionKey::ForceUpdate],
        )
    }

    fn visible(scope: &Scope<'_>) -> bool {
        scope
            .props
            .app_updated
            .as_ref()
            .map(|u| u.available)
            .unwrap_or(false)
    }
}

impl View for AppUpdateBanner {
    fn name(&self) -> &'static str {
        "AppUpdateBanner"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        if !Self::visible(scope) || area.height == 0 {
            return;
        }
        let p = scope.palette;
        let version = scope
            .props
            .app_updated
            .as_ref()
            .and_then(|u| u.latest_version.as_deref())
            .unwrap_or("");

        let mut spans = vec![
            Span::styled(" ⬆ ", styles::accent_bold(p)),
            Span::styled("This app has just been updated", styles::text(p)),
        ];
        if !version.is_empty() {
            spans.push(Span::styled(format!(" to {version}"), styles::text(p)));
        }
        spans.push(Span::raw("   "));
        spans.extend(styles::hint(p, "U", "Restart now"));
        spans.extend(styles::hint(p, "u", "Dismiss"));

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(p.popup))
            .render(area, buf);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        if !Self::visible(scope) {
            return false;
        }
        match key {
            InputKey::Char('U') => scope.props.actions.force_update(),
            InputKey::Char('u') => scope.props.actions.reset_app_update(),
            _ => false,
        }
    }
}
