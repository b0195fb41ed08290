//! Settings: theme and default short URLs ordering

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::state::StateKey;
use shlink_core::{Order, OrderDir, OrderableField};

use crate::component::{Scope, View};
use crate::theme::styles;

/// Ordering offered after `current` when cycling the default:
/// unordered, then every field ascending and descending
pub fn next_default_ordering(current: Order) -> Order {
    let options: Vec<Order> = std::iter::once(Order::unordered())
        .chain(OrderableField::ALL.into_iter().flat_map(|field| {
            [Order::new(field, OrderDir::Asc), Order::new(field, OrderDir::Desc)]
        }))
        .collect();
    let position = options.iter().position(|o| *o == current).unwrap_or(0);
    options[(position + 1) % options.len()]
}

fn ordering_label(order: Order) -> String {
    match (order.field, order.dir) {
        (Some(field), Some(OrderDir::Asc)) => format!("{} ▲", field.label()),
        (Some(field), Some(OrderDir::Desc)) => format!("{} ▼", field.label()),
        _ => "Order by...".to_string(),
    }
}

pub struct SettingsView;

impl SettingsView {
    pub fn connection() -> Connect {
        connect(
            &[StateKey::Settings],
            &[ActionKey::CycleTheme, ActionKey::SetDefaultOrdering],
        )
    }
}

impl View for SettingsView {
    fn name(&self) -> &'static str {
        "SettingsView"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let Some(settings) = scope.props.settings.as_ref() else {
            return;
        };
        let p = scope.palette;
        let block = styles::panel(p, true).title(" Settings ");
        let inner = block.inner(area);
        block.render(area, buf);

        let [appearance, ordering, _, hints] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(vec![
            Line::styled(" User interface", styles::accent_bold(p)),
            Line::from(vec![
                Span::styled("   Theme: ", styles::text_secondary(p)),
                Span::styled(settings.ui.theme.to_string(), styles::text(p)),
            ]),
        ])
        .render(appearance, buf);

        Paragraph::new(vec![
            Line::styled(" Short URLs list", styles::accent_bold(p)),
            Line::from(vec![
                Span::styled("   Default ordering: ", styles::text_secondary(p)),
                Span::styled(
                    ordering_label(settings.short_urls_list.default_ordering),
                    styles::text(p),
                ),
            ]),
        ])
        .render(ordering, buf);

        let mut line = styles::hint(p, "t", "Change theme");
        line.extend(styles::hint(p, "o", "Change default ordering"));
        line.extend(styles::hint(p, "g", "Home"));
        Paragraph::new(Line::from(line)).render(hints, buf);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let actions = &scope.props.actions;
        match key {
            InputKey::Char('t') => actions.cycle_theme(),
            InputKey::Char('o') => {
                let current = scope
                    .props
                    .settings
                    .as_ref()
                    .map(|s| s.short_urls_list.default_ordering)
                    .unwrap_or_default();
                actions.set_default_ordering(next_default_ordering(current))
            }
            _ => false,
        }
    }
}
