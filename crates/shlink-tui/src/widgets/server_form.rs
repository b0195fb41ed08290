//! Create and edit form for a server

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::server_form::{ServerFormField, ServerFormMode, ServerFormState};
use shlink_app::state::StateKey;

use crate::component::{Scope, View};
use crate::layout;
use crate::theme::styles;

pub struct ServerForm;

impl ServerForm {
    pub fn connection() -> Connect {
        connect(
            &[StateKey::Ui],
            &[
                ActionKey::EditServerForm,
                ActionKey::SubmitServerForm,
                ActionKey::Navigate,
            ],
        )
    }

    fn form<'s>(scope: &'s Scope<'_>) -> Option<&'s ServerFormState> {
        scope.props.ui.as_ref().and_then(|ui| ui.server_form.as_ref())
    }

    /// API keys are shown with everything but the last four characters hidden
    fn masked(value: &str) -> String {
        let count = value.chars().count();
        let visible = count.saturating_sub(4);
        value
            .chars()
            .enumerate()
            .map(|(i, c)| if i < visible { '•' } else { c })
            .collect()
    }
}

impl View for ServerForm {
    fn name(&self) -> &'static str {
        "ServerForm"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let Some(form) = Self::form(scope) else {
            return;
        };
        let p = scope.palette;

        let title = match &form.mode {
            ServerFormMode::Create => " Add new server ".to_string(),
            ServerFormMode::Edit(_) => format!(" Edit \"{}\" ", form.data.name),
        };
        let area = layout::centered(area, 70, 12);
        let block = styles::panel(p, true).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        for (i, field) in ServerFormField::ALL.iter().enumerate() {
            let focused = form.focus == *field;
            let value = match field {
                ServerFormField::ApiKey => Self::masked(form.value(*field)),
                _ => form.value(*field).to_string(),
            };
            let label_style = if focused {
                styles::accent_bold(p)
            } else {
                styles::text_secondary(p)
            };
            let mut spans = vec![
                Span::styled(format!(" {:<9}", field.label()), label_style),
                Span::styled(value, styles::text(p)),
            ];
            if focused {
                spans.push(Span::styled("▏", styles::accent(p)));
            }
            Paragraph::new(Line::from(spans)).render(rows[i * 2], buf);
        }

        if let Some(error) = &form.error {
            Paragraph::new(Span::styled(format!(" {error}"), styles::error(p))).render(rows[5], buf);
        }

        let mut hints = styles::hint(p, "Tab", "Next field");
        hints.extend(styles::hint(p, "Enter", "Save"));
        hints.extend(styles::hint(p, "Esc", "Cancel"));
        Paragraph::new(Line::from(hints)).render(rows[6], buf);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let Some(form) = Self::form(scope) else {
            return false;
        };
        let actions = &scope.props.actions;
        let mut next = form.clone();

        match key {
            InputKey::Enter => return actions.submit_server_form(),
            InputKey::Esc => {
                let back = match form.mode {
                    ServerFormMode::Create => "/",
                    ServerFormMode::Edit(_) => "/manage-servers",
                };
                return actions.navigate(back);
            }
            InputKey::Tab | InputKey::Down => next.focus = form.focus.next(),
            InputKey::BackTab | InputKey::Up => next.focus = form.focus.prev(),
            InputKey::Backspace => next.pop_char(),
            InputKey::Char(c) => next.push_char(c),
            // The form owns the keyboard while open
            _ => return true,
        }
        actions.edit_server_form(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{drain, press, props_with_actions, server, TestTerminal};
    use shlink_app::connect::OwnProps;
    use shlink_app::message::Message;
    use shlink_app::state::{mutate, AppState};

    fn with_form(form: ServerFormState) -> AppState {
        let mut state = AppState::default();
        mutate(&mut state.ui, |ui| ui.server_form = Some(form));
        state
    }

    #[test]
    fn test_masks_api_key() {
        assert_eq!(ServerForm::masked("abcdef12"), "••••ef12");
        assert_eq!(ServerForm::masked("abc"), "abc");
    }

    #[test]
    fn test_renders_edit_form_with_error() {
        let mut form = ServerFormState::edit(&server("a"));
        form.error = Some("URL is not valid".to_string());
        let (props, _rx) =
            props_with_actions(&ServerForm::connection(), &with_form(form), OwnProps::default());

        let mut term = TestTerminal::new();
        term.render_view(&ServerForm, props);

        assert!(term.buffer_contains("Edit \"Server a\""));
        assert!(term.buffer_contains("https://a.example.com"));
        assert!(term.buffer_contains("URL is not valid"));
        assert!(!term.buffer_contains("api-key"));
    }

    #[test]
    fn test_typing_sends_updated_form() {
        let state = with_form(ServerFormState::create());
        let (props, mut rx) =
            props_with_actions(&ServerForm::connection(), &state, OwnProps::default());

        assert!(press(&ServerForm, props.clone(), InputKey::Char('x')));
        assert!(press(&ServerForm, props.clone(), InputKey::Tab));
        assert!(press(&ServerForm, props, InputKey::Enter));

        let sent = drain(&mut rx);
        assert!(matches!(&sent[0], Message::ServerFormChanged(f) if f.data.name == "x"));
        assert!(
            matches!(&sent[1], Message::ServerFormChanged(f) if f.focus == ServerFormField::Url)
        );
        assert!(matches!(sent[2], Message::SubmitServerForm));
    }

    #[test]
    fn test_escape_leaves_form() {
        let state = with_form(ServerFormState::edit(&server("a")));
        let (props, mut rx) =
            props_with_actions(&ServerForm::connection(), &state, OwnProps::default());

        assert!(press(&ServerForm, props, InputKey::Esc));
        assert!(matches!(&drain(&mut rx)[0], Message::Navigate(p) if p == "/manage-servers"));
    }
}
