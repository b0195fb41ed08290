//! Manage tags section: searchable list of tags with their stats

use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::state::StateKey;
use shlink_core::{ColorGenerator, TagsList};

use crate::component::{Scope, View};
use crate::theme::styles;

pub struct TagsListView {
    colors: Arc<ColorGenerator>,
}

impl TagsListView {
    pub fn new(colors: Arc<ColorGenerator>) -> Self {
        Self { colors }
    }

    pub fn connection() -> Connect {
        connect(
            &[StateKey::TagsList, StateKey::Ui],
            &[
                ActionKey::ListTags,
                ActionKey::SetTagsSearch,
                ActionKey::MoveCursor,
            ],
        )
    }

    fn search_focused(scope: &Scope<'_>) -> bool {
        scope.props.ui.as_ref().map(|ui| ui.search_focused).unwrap_or(false)
    }

    fn render_table(&self, scope: &Scope<'_>, tags: &TagsList, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let filtered = tags.filtered();
        if filtered.is_empty() {
            let text = if tags.search_term.is_empty() {
                "No tags found"
            } else {
                "No tags match the search"
            };
            super::render_message(vec![Line::styled(text, styles::text_muted(p))], area, buf);
            return;
        }

        let rows = filtered.iter().map(|tag| {
            let stats = tags.stats_for(tag);
            Row::new(vec![
                Cell::from(Line::from(vec![
                    styles::tag_bullet(&self.colors, tag),
                    Span::raw(" "),
                    Span::styled(tag.to_string(), styles::text(p)),
                ])),
                Cell::from(
                    stats
                        .map(|s| s.short_urls_count.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                )
                .style(styles::text_secondary(p)),
                Cell::from(
                    stats
                        .map(|s| s.visits_count.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                )
                .style(styles::text_secondary(p)),
            ])
        });
        let header = Row::new(["Tag", "Short URLs", "Visits"]).style(styles::accent_bold(p));
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(12),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .row_highlight_style(styles::selected(p));

        let cursor = scope.props.ui.as_ref().map(|ui| ui.cursor).unwrap_or(0);
        let mut state = TableState::default().with_selected(Some(cursor));
        StatefulWidget::render(table, area, buf, &mut state);
    }
}

impl View for TagsListView {
    fn name(&self) -> &'static str {
        "TagsListView"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let Some(tags) = scope.props.tags_list.as_ref() else {
            return;
        };
        let p = scope.palette;
        let focused = Self::search_focused(scope);

        let [search_area, table_area, hints_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let search = if tags.search_term.is_empty() && !focused {
            Span::styled("Search...", styles::text_muted(p))
        } else {
            Span::styled(tags.search_term.clone(), styles::text(p))
        };
        let mut line = vec![Span::raw(" "), search];
        if focused {
            line.push(Span::styled("▏", styles::accent(p)));
        }
        Paragraph::new(Line::from(line))
            .block(styles::panel(p, focused))
            .render(search_area, buf);

        if tags.loading && tags.tags.is_empty() {
            super::render_message(
                vec![Line::styled("Loading...", styles::text_muted(p))],
                table_area,
                buf,
            );
        } else if tags.error {
            super::render_message(
                vec![Line::styled("Error loading tags :(", styles::error(p))],
                table_area,
                buf,
            );
        } else {
            self.render_table(scope, tags, table_area, buf);
        }

        let hints = if focused {
            styles::hint(p, "Enter", "Done")
        } else {
            let mut hints = styles::hint(p, "/", "Search");
            hints.extend(styles::hint(p, "r", "Reload"));
            hints.extend(styles::hint(p, "Tab", "Short URLs"));
            hints
        };
        Paragraph::new(Line::from(hints)).render(hints_area, buf);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let actions = &scope.props.actions;
        let term = scope
            .props
            .tags_list
            .as_ref()
            .map(|t| t.search_term.clone())
            .unwrap_or_default();

        if Self::search_focused(scope) {
            return match key {
                InputKey::Enter | InputKey::Esc => actions.focus_tags_search(false),
                InputKey::Backspace => {
                    let mut term = term;
                    term.pop();
                    actions.set_tags_search(term)
                }
                InputKey::Char(c) => actions.set_tags_search(format!("{term}{c}")),
                _ => true,
            };
        }

        match key {
            InputKey::Char('/') => actions.focus_tags_search(true),
            InputKey::Char('r') => actions.list_tags(),
            InputKey::Up | InputKey::Char('k') => actions.move_cursor(-1),
            InputKey::Down | InputKey::Char('j') => actions.move_cursor(1),
            InputKey::Esc if !term.is_empty() => actions.set_tags_search(""),
            _ => false,
        }
    }

    fn on_mount(&self, scope: &Scope<'_>) {
        scope.props.actions.list_tags();
    }
}
