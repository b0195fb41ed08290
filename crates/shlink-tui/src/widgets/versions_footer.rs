//! Footer line with the pending notice and the client/server versions

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use shlink_app::connect::{connect, Connect};
use shlink_app::state::StateKey;
use shlink_core::{printable_version, SelectedServer};

use crate::component::{Scope, View};
use crate::theme::styles;

pub struct VersionsFooter;

impl VersionsFooter {
    pub fn connection() -> Connect {
        connect(&[StateKey::SelectedServer, StateKey::Ui], &[])
    }

    /// `Client: v1.0.0 - Server: v2.6.0`, the server part only once it answered
    pub fn versions_text(selected: Option<&SelectedServer>) -> String {
        let client = printable_version(env!("CARGO_PKG_VERSION"));
        match selected {
            Some(SelectedServer::Reachable {
                printable_version, ..
            }) => format!("Client: {client} - Server: {printable_version}"),
            _ => format!("Client: {client}"),
        }
    }
}

impl View for VersionsFooter {
    fn name(&self) -> &'static str {
        "VersionsFooter"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let versions = Self::versions_text(scope.props.selected_server.as_deref());
        let versions_width = versions.chars().count() as u16 + 1;

        if let Some(notice) = scope.props.ui.as_ref().and_then(|ui| ui.notice.as_deref()) {
            let width = area.width.saturating_sub(versions_width) as usize;
            let line = Line::from(vec![
                Span::raw(" "),
                Span::styled(super::truncate(notice, width.saturating_sub(12)), styles::warning(p)),
                Span::styled("  [Esc]", styles::text_muted(p)),
            ]);
            Paragraph::new(line).render(area, buf);
        }

        if area.width >= versions_width {
            let right = Rect {
                x: area.x + area.width - versions_width,
                width: versions_width,
                ..area
            };
            Paragraph::new(Span::styled(versions, styles::text_muted(p))).render(right, buf);
        }
    }
}
