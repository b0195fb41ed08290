//! Form that creates a short URL on the selected server
//!
//! Tags are edited through the tags selector opened for the form. Tab is left
//! to the server view so it still switches sections.

use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::router::{server_section_path, ServerSection};
use shlink_app::short_url_form::{ShortUrlFormField, ShortUrlFormState};
use shlink_app::state::StateKey;
use shlink_app::tag_selector::TagsSelectorTarget;
use shlink_core::{supports_short_url_titles, ColorGenerator};

use crate::component::{Scope, View};
use crate::theme::styles;

pub struct CreateShortUrlForm {
    colors: Arc<ColorGenerator>,
}

impl CreateShortUrlForm {
    pub fn new(colors: Arc<ColorGenerator>) -> Self {
        Self { colors }
    }

    pub fn connection() -> Connect {
        connect(
            &[StateKey::SelectedServer, StateKey::Ui],
            &[
                ActionKey::EditShortUrlForm,
                ActionKey::SubmitShortUrlForm,
                ActionKey::OpenTagsSelector,
                ActionKey::Navigate,
            ],
        )
    }

    fn form<'s>(scope: &'s Scope<'_>) -> Option<&'s ShortUrlFormState> {
        scope
            .props
            .ui
            .as_ref()
            .and_then(|ui| ui.short_url_form.as_ref())
    }

    fn supports_titles(scope: &Scope<'_>) -> bool {
        supports_short_url_titles(scope.props.selected_server.as_ref().and_then(|s| s.version()))
    }

    fn field_line<'a>(
        &self,
        scope: &Scope<'_>,
        form: &'a ShortUrlFormState,
        field: ShortUrlFormField,
    ) -> Line<'a> {
        let p = scope.palette;
        let focused = form.focus == field;
        let label_style = if focused {
            styles::accent_bold(p)
        } else {
            styles::text_secondary(p)
        };
        let mut spans = vec![Span::styled(format!(" {:<10}", field.label()), label_style)];

        match field {
            ShortUrlFormField::Tags if form.tags.is_empty() => {
                spans.push(Span::styled("none", styles::text_muted(p)));
            }
            ShortUrlFormField::Tags => {
                for tag in &form.tags {
                    spans.push(styles::tag_chip(&self.colors, tag));
                    spans.push(Span::raw(" "));
                }
            }
            _ => {
                spans.push(Span::styled(form.value(field), styles::text(p)));
                if focused {
                    spans.push(Span::styled("▏", styles::accent(p)));
                }
            }
        }
        Line::from(spans)
    }
}

impl View for CreateShortUrlForm {
    fn name(&self) -> &'static str {
        "CreateShortUrlForm"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let Some(form) = Self::form(scope) else {
            return;
        };
        let p = scope.palette;
        let fields = ShortUrlFormField::visible(Self::supports_titles(scope));

        let block = styles::panel(p, true).title(" Create short URL ");
        let inner = block.inner(area);
        block.render(area, buf);

        let mut constraints = vec![Constraint::Length(2); fields.len()];
        constraints.extend([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ]);
        let rows = Layout::vertical(constraints).split(inner);

        for (i, field) in fields.iter().enumerate() {
            Paragraph::new(self.field_line(scope, form, *field)).render(rows[i], buf);
        }

        let status = if form.saving {
            Some(Span::styled(" Saving...", styles::text_muted(p)))
        } else if let Some(error) = &form.error {
            Some(Span::styled(format!(" {error}"), styles::error(p)))
        } else {
            form.created.as_ref().map(|created| {
                Span::styled(
                    format!(" Created {}", created.short_url),
                    styles::success(p),
                )
            })
        };
        if let Some(status) = status {
            Paragraph::new(status).render(rows[fields.len()], buf);
        }

        let mut hints = styles::hint(p, "↑↓", "Field");
        if form.focus == ShortUrlFormField::Tags {
            hints.extend(styles::hint(p, "Enter", "Edit tags"));
        } else {
            hints.extend(styles::hint(p, "Enter", "Save"));
        }
        hints.extend(styles::hint(p, "Esc", "Back to list"));
        Paragraph::new(Line::from(hints)).render(rows[fields.len() + 2], buf);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let Some(form) = Self::form(scope) else {
            return false;
        };
        let actions = &scope.props.actions;
        let supports_titles = Self::supports_titles(scope);
        let mut next = form.clone();

        match key {
            InputKey::Enter if form.focus == ShortUrlFormField::Tags => {
                return actions.open_tags_selector(TagsSelectorTarget::NewShortUrl);
            }
            InputKey::Enter => return actions.submit_short_url_form(),
            InputKey::Esc => {
                let Some(id) = scope.props.ui.as_ref().and_then(|ui| ui.route.server_id()) else {
                    return false;
                };
                return actions.navigate(server_section_path(id, ServerSection::ShortUrls));
            }
            InputKey::Down => next.focus = form.focus.step(1, supports_titles),
            InputKey::Up => next.focus = form.focus.step(-1, supports_titles),
            InputKey::Backspace => next.pop_char(),
            InputKey::Char(c) => next.push_char(c),
            _ => return false,
        }
        if next == *form {
            return true;
        }
        actions.edit_short_url_form(next)
    }
}
