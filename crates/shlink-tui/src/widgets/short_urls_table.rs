//! Short URLs table with sortable headers and paging
//!
//! The table keeps no ordering of its own: the arrows in the header come from
//! the list params it receives, and activating a header only dispatches
//! `order_by_column`.

use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::state::{ShortUrlsListState, StateKey};
use shlink_core::{
    supports_short_url_titles, ColorGenerator, Order, OrderDir, OrderableField, ShortUrl,
};

use crate::component::{Scope, View};
use crate::theme::{styles, Palette};

/// Header cells in display order with the fields each one orders by. The third
/// cell composes "Title / Long URL" on servers that store titles; the tags
/// cell can't be ordered.
fn header_cells(supports_titles: bool) -> [Vec<OrderableField>; 5] {
    let urls = if supports_titles {
        vec![OrderableField::Title, OrderableField::LongUrl]
    } else {
        vec![OrderableField::LongUrl]
    };
    [
        vec![OrderableField::DateCreated],
        vec![OrderableField::ShortCode],
        urls,
        Vec::new(),
        vec![OrderableField::Visits],
    ]
}

/// Sortable fields in the order Left/Right walks through them
pub fn header_fields(supports_titles: bool) -> Vec<OrderableField> {
    header_cells(supports_titles).into_iter().flatten().collect()
}

fn field_title(order: &Order, field: OrderableField) -> String {
    match order.dir_for(field) {
        Some(OrderDir::Asc) => format!("{} ▲", field.label()),
        Some(OrderDir::Desc) => format!("{} ▼", field.label()),
        None => field.label().to_string(),
    }
}

/// Header titles with the arrow of the active ordering
pub fn column_titles(order: &Order, supports_titles: bool) -> Vec<String> {
    header_cells(supports_titles)
        .iter()
        .map(|fields| {
            if fields.is_empty() {
                return "Tags".to_string();
            }
            fields
                .iter()
                .map(|field| field_title(order, *field))
                .collect::<Vec<_>>()
                .join(" / ")
        })
        .collect()
}

pub struct ShortUrlsTable {
    colors: Arc<ColorGenerator>,
}

impl ShortUrlsTable {
    pub fn new(colors: Arc<ColorGenerator>) -> Self {
        Self { colors }
    }

    pub fn connection() -> Connect {
        connect(
            &[StateKey::ShortUrlsList, StateKey::SelectedServer, StateKey::Ui],
            &[
                ActionKey::MoveCursor,
                ActionKey::OrderByColumn,
                ActionKey::ChangePage,
            ],
        )
    }

    fn supports_titles(scope: &Scope<'_>) -> bool {
        supports_short_url_titles(scope.props.selected_server.as_ref().and_then(|s| s.version()))
    }

    fn focused_field(scope: &Scope<'_>) -> Option<OrderableField> {
        let column = scope.props.ui.as_ref().map(|ui| ui.column).unwrap_or(0);
        header_fields(Self::supports_titles(scope)).get(column).copied()
    }

    fn header<'a>(
        p: &Palette,
        order: &Order,
        supports_titles: bool,
        focused: Option<OrderableField>,
    ) -> Row<'a> {
        let cells = header_cells(supports_titles).into_iter().map(|fields| {
            if fields.is_empty() {
                return Cell::from(Span::styled("Tags", styles::accent_bold(p)));
            }
            let mut spans = Vec::new();
            for (i, field) in fields.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" / ", styles::accent_bold(p)));
                }
                let style = if Some(field) == focused {
                    styles::selected(p)
                } else {
                    styles::accent_bold(p)
                };
                spans.push(Span::styled(field_title(order, field), style));
            }
            Cell::from(Line::from(spans))
        });
        Row::new(cells)
    }

    fn row<'a>(&self, p: &Palette, url: &'a ShortUrl, supports_titles: bool) -> Row<'a> {
        let target = match url.title.as_deref().filter(|_| supports_titles) {
            Some(title) => Line::from(vec![
                Span::styled(title, styles::text(p)),
                Span::raw(" "),
                Span::styled(url.long_url.as_str(), styles::text_muted(p)),
            ]),
            None => Line::styled(url.long_url.as_str(), styles::text(p)),
        };
        let mut cells = vec![
            Cell::from(url.date_created.format("%Y-%m-%d %H:%M").to_string())
                .style(styles::text_secondary(p)),
            Cell::from(url.short_url.as_str()).style(styles::accent(p)),
            Cell::from(target),
        ];
        let chips: Vec<Span> = url
            .tags
            .iter()
            .flat_map(|tag| [styles::tag_chip(&self.colors, tag), Span::raw(" ")])
            .collect();
        cells.push(Cell::from(Line::from(chips)));
        cells.push(Cell::from(url.visits_count.to_string()).style(styles::text(p)));
        Row::new(cells)
    }

    fn render_filter(&self, p: &Palette, tags: &[String], area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(" Filtering by: ", styles::text_muted(p))];
        for tag in tags {
            spans.push(styles::tag_chip(&self.colors, tag));
            spans.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_footer(p: &Palette, list: &ShortUrlsListState, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        if let Some(pagination) = list.list.as_ref().map(|l| &l.pagination) {
            spans.push(Span::styled(
                format!(
                    " Page {} of {} · {} short URLs   ",
                    pagination.current_page,
                    pagination.pages_count.max(1),
                    pagination.total_items
                ),
                styles::text_secondary(p),
            ));
            if pagination.has_prev() {
                spans.extend(styles::hint(p, "PgUp", "Prev"));
            }
            if pagination.has_next() {
                spans.extend(styles::hint(p, "PgDn", "Next"));
            }
        }
        spans.extend(styles::hint(p, "←→", "Column"));
        spans.extend(styles::hint(p, "o", "Order"));
        spans.extend(styles::hint(p, "t", "Filter tags"));
        spans.extend(styles::hint(p, "c", "Create"));
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

impl View for ShortUrlsTable {
    fn name(&self) -> &'static str {
        "ShortUrlsTable"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let Some(list) = scope.props.short_urls_list.as_ref() else {
            return;
        };
        let p = scope.palette;
        let supports_titles = Self::supports_titles(scope);

        let filter_height = if list.params.tags.is_empty() { 0 } else { 1 };
        let [filter_area, table_area, footer_area] = Layout::vertical([
            Constraint::Length(filter_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if filter_height > 0 {
            self.render_filter(p, &list.params.tags, filter_area, buf);
        }
        Self::render_footer(p, list, footer_area, buf);

        if let Some(error) = &list.error {
            super::render_message(
                vec![
                    Line::styled("Error loading short URLs :(", styles::error(p)),
                    Line::styled(error.clone(), styles::text_muted(p)),
                ],
                table_area,
                buf,
            );
            return;
        }

        let rows: Vec<Row> = match &list.list {
            Some(loaded) if !loaded.data.is_empty() => loaded
                .data
                .iter()
                .map(|url| self.row(p, url, supports_titles))
                .collect(),
            Some(_) => {
                let text = if list.loading { "Loading..." } else { "No results found" };
                super::render_message(vec![Line::styled(text, styles::text_muted(p))], table_area, buf);
                return;
            }
            None => {
                super::render_message(
                    vec![Line::styled("Loading...", styles::text_muted(p))],
                    table_area,
                    buf,
                );
                return;
            }
        };

        let header = Self::header(
            p,
            &list.params.order,
            supports_titles,
            Self::focused_field(scope),
        );
        let widths = [
            Constraint::Length(17),
            Constraint::Percentage(20),
            Constraint::Fill(3),
            Constraint::Fill(1),
            Constraint::Length(9),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(styles::selected(p));
        let cursor = scope.props.ui.as_ref().map(|ui| ui.cursor).unwrap_or(0);
        let mut state = TableState::default().with_selected(Some(cursor));
        StatefulWidget::render(table, table_area, buf, &mut state);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let actions = &scope.props.actions;
        match key {
            InputKey::Up | InputKey::Char('k') => actions.move_cursor(-1),
            InputKey::Down | InputKey::Char('j') => actions.move_cursor(1),
            InputKey::Left | InputKey::Char('h') => actions.move_column(-1),
            InputKey::Right | InputKey::Char('l') => actions.move_column(1),
            InputKey::Enter | InputKey::Char('o') => Self::focused_field(scope)
                .map(|field| actions.order_by_column(field))
                .unwrap_or(false),
            InputKey::PageDown | InputKey::PageUp => {
                let pagination = scope
                    .props
                    .short_urls_list
                    .as_ref()
                    .and_then(|l| l.list.as_ref())
                    .map(|l| l.pagination);
                match (key, pagination) {
                    (InputKey::PageDown, Some(p)) if p.has_next() => {
                        actions.change_page(p.current_page + 1)
                    }
                    (InputKey::PageUp, Some(p)) if p.has_prev() => {
                        actions.change_page(p.current_page - 1)
                    }
                    _ => true,
                }
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{drain, press, props_with_actions, reachable, TestTerminal};
    use chrono::{TimeZone, Utc};
    use shlink_app::connect::OwnProps;
    use shlink_app::message::Message;
    use shlink_app::state::{mutate, AppState};
    use shlink_core::{Pagination, ShortUrlsList};

    fn short_url(code: &str, tags: &[&str]) -> ShortUrl {
        ShortUrl {
            short_code: code.to_string(),
            short_url: format!("https://s.test/{code}"),
            long_url: format!("https://example.com/{code}"),
            date_created: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap(),
            visits_count: 42,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            title: Some(format!("Title {code}")),
            domain: None,
        }
    }

    fn state(version: &str, page: u32, pages: u32) -> AppState {
        let mut state = AppState::default();
        state.selected_server = Arc::new(reachable("a", version));
        mutate(&mut state.short_urls_list, |list| {
            list.list = Some(ShortUrlsList {
                data: vec![short_url("abc", &["foo", "bar"]), short_url("def", &[])],
                pagination: Pagination {
                    current_page: page,
                    pages_count: pages,
                    items_per_page: 2,
                    items_in_current_page: 2,
                    total_items: pages as u64 * 2,
                },
            });
        });
        state
    }

    fn table() -> ShortUrlsTable {
        ShortUrlsTable::new(Arc::new(ColorGenerator::new()))
    }

    #[test]
    fn test_column_titles_without_titles_support() {
        let titles = column_titles(&Order::unordered(), false);
        assert_eq!(
            titles,
            vec!["Created at", "Short URL", "Long URL", "Tags", "Visits"]
        );
    }

    #[test]
    fn test_column_titles_show_active_order() {
        let order = Order::new(OrderableField::Visits, OrderDir::Desc);
        let titles = column_titles(&order, true);
        assert_eq!(
            titles,
            vec!["Created at", "Short URL", "Title / Long URL", "Tags", "Visits ▼"]
        );

        let order = Order::new(OrderableField::ShortCode, OrderDir::Asc);
        assert_eq!(column_titles(&order, false)[1], "Short URL ▲");
    }

    #[test]
    fn test_composed_column_keeps_column_count() {
        assert_eq!(column_titles(&Order::unordered(), true).len(), 5);
        assert_eq!(column_titles(&Order::unordered(), false).len(), 5);

        let order = Order::new(OrderableField::Title, OrderDir::Asc);
        assert_eq!(column_titles(&order, true)[2], "Title ▲ / Long URL");
        assert_eq!(
            header_fields(true),
            vec![
                OrderableField::DateCreated,
                OrderableField::ShortCode,
                OrderableField::Title,
                OrderableField::LongUrl,
                OrderableField::Visits,
            ]
        );
    }

    #[test]
    fn test_renders_rows_and_pagination() {
        let (props, _rx) = props_with_actions(
            &ShortUrlsTable::connection(),
            &state("2.6.0", 1, 3),
            OwnProps::default(),
        );
        let mut term = TestTerminal::with_size(140, 12);
        term.render_view(&table(), props);

        assert!(term.buffer_contains("Title / Long URL"));
        assert!(term.buffer_contains("Title abc"));
        assert!(term.buffer_contains("https://s.test/abc"));
        assert!(term.buffer_contains("2024-03-01 10:30"));
        assert!(term.buffer_contains(" foo "));
        assert!(term.buffer_contains("Page 1 of 3"));
        assert!(term.buffer_contains("[PgDn] Next"));
        assert!(!term.buffer_contains("[PgUp] Prev"));
    }

    #[test]
    fn test_title_column_hidden_on_old_servers() {
        let (props, _rx) = props_with_actions(
            &ShortUrlsTable::connection(),
            &state("2.5.0", 1, 1),
            OwnProps::default(),
        );
        let mut term = TestTerminal::with_size(140, 12);
        term.render_view(&table(), props);

        assert!(!term.buffer_contains("Title abc"));
        assert!(!term.buffer_contains("Title / Long URL"));
    }

    #[test]
    fn test_error_state() {
        let mut state = state("2.6.0", 1, 1);
        mutate(&mut state.short_urls_list, |list| {
            list.error = Some("HTTP 500".to_string())
        });
        let (props, _rx) =
            props_with_actions(&ShortUrlsTable::connection(), &state, OwnProps::default());
        let mut term = TestTerminal::new();
        term.render_view(&table(), props);

        assert!(term.buffer_contains("Error loading short URLs"));
        assert!(term.buffer_contains("HTTP 500"));
    }

    #[test]
    fn test_order_key_uses_focused_column() {
        let mut state = state("2.6.0", 1, 1);
        mutate(&mut state.ui, |ui| ui.column = 4);
        let (props, mut rx) =
            props_with_actions(&ShortUrlsTable::connection(), &state, OwnProps::default());

        assert!(press(&table(), props, InputKey::Enter));
        assert!(matches!(
            drain(&mut rx)[0],
            Message::OrderByColumn(OrderableField::Visits)
        ));
    }

    #[test]
    fn test_paging_keys_respect_bounds() {
        let (props, mut rx) = props_with_actions(
            &ShortUrlsTable::connection(),
            &state("2.6.0", 2, 3),
            OwnProps::default(),
        );

        assert!(press(&table(), props.clone(), InputKey::PageDown));
        assert!(press(&table(), props, InputKey::PageUp));
        let sent = drain(&mut rx);
        assert!(matches!(sent[0], Message::ChangePage(3)));
        assert!(matches!(sent[1], Message::ChangePage(1)));

        let (props, mut rx) = props_with_actions(
            &ShortUrlsTable::connection(),
            &state("2.6.0", 1, 1),
            OwnProps::default(),
        );
        assert!(press(&table(), props, InputKey::PageDown));
        assert!(drain(&mut rx).is_empty());
    }
}
