//! Tag filter input with colored chips and suggestions
//!
//! Every change is reported as the complete new selection through the
//! `on_change` action of the selector's target. Suggestions come from the tags
//! list, loaded on behalf of the selector's mount token when it mounts; the
//! request is dropped when it unmounts.

use std::sync::{Arc, Mutex};

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget};

use shlink_app::connect::{connect, ActionKey, Connect};
use shlink_app::input_key::InputKey;
use shlink_app::state::{MountId, StateKey};
use shlink_app::tag_selector::{
    add_tags, remove_tag, suggestions, TagsSelectorState, TagsSelectorTarget, TAG_DELIMITERS,
};
use shlink_core::ColorGenerator;

use crate::component::{Scope, View};
use crate::theme::styles;

/// Suggestions shown at once
const MAX_SUGGESTIONS: usize = 6;

/// Rows the selector may cover: bordered input plus the suggestions
pub const SELECTOR_HEIGHT: u16 = 3 + MAX_SUGGESTIONS as u16;

pub struct TagsSelector {
    colors: Arc<ColorGenerator>,
    /// Token of the current mount, released on unmount
    mounted: Mutex<Option<MountId>>,
}

impl TagsSelector {
    pub fn new(colors: Arc<ColorGenerator>) -> Self {
        Self {
            colors,
            mounted: Mutex::new(None),
        }
    }

    pub fn connection() -> Connect {
        connect(
            &[StateKey::TagsList, StateKey::Ui],
            &[
                ActionKey::ListTags,
                ActionKey::EditTagsInput,
                ActionKey::ChangeTagsFilter,
                ActionKey::ChangeShortUrlTags,
                ActionKey::CloseTagsSelector,
            ],
        )
    }

    fn selector<'s>(scope: &'s Scope<'_>) -> Option<&'s TagsSelectorState> {
        scope.props.ui.as_ref().and_then(|ui| ui.tags_selector.as_ref())
    }

    /// Selection shown and edited: explicit props first, then the selector state
    fn selected(scope: &Scope<'_>, selector: &TagsSelectorState) -> Vec<String> {
        scope
            .props
            .selected_tags
            .clone()
            .unwrap_or_else(|| selector.selected.clone())
    }

    fn known_tags<'s>(scope: &'s Scope<'_>) -> &'s [String] {
        scope
            .props
            .tags_list
            .as_ref()
            .map(|t| t.tags.as_slice())
            .unwrap_or(&[])
    }

    /// Report the new selection to whatever the selector edits
    fn change(scope: &Scope<'_>, selector: &TagsSelectorState, tags: Vec<String>) -> bool {
        let actions = &scope.props.actions;
        match selector.target {
            TagsSelectorTarget::Filter => actions.change_tags_filter(tags),
            TagsSelectorTarget::NewShortUrl => actions.change_short_url_tags(tags),
        }
    }

    fn commit(
        scope: &Scope<'_>,
        selector: &TagsSelectorState,
        selected: &[String],
        text: &str,
    ) -> bool {
        let next = add_tags(selected, text);
        if next.as_slice() != selected {
            Self::change(scope, selector, next);
        }
        scope.props.actions.edit_tags_input("")
    }
}

impl View for TagsSelector {
    fn name(&self) -> &'static str {
        "TagsSelector"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let Some(selector) = Self::selector(scope) else {
            return;
        };
        let p = scope.palette;
        let selected = Self::selected(scope, selector);
        let matches = suggestions(Self::known_tags(scope), &selected, &selector.input);

        let [input_area, list_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(matches.len().min(MAX_SUGGESTIONS) as u16),
        ])
        .areas(area);

        let mut spans: Vec<Span> = Vec::new();
        for tag in &selected {
            spans.push(styles::tag_chip(&self.colors, tag));
            spans.push(Span::raw(" "));
        }
        let (title, placeholder) = match selector.target {
            TagsSelectorTarget::Filter => (" Filter by tags ", "Add tags to the filter"),
            TagsSelectorTarget::NewShortUrl => (" Tags ", "Add tags to the URL"),
        };
        if selected.is_empty() && selector.input.is_empty() {
            spans.push(Span::styled(placeholder, styles::text_muted(p)));
        }
        spans.push(Span::styled(selector.input.clone(), styles::text(p)));
        spans.push(Span::styled("▏", styles::accent(p)));

        Clear.render(input_area, buf);
        Paragraph::new(Line::from(spans))
            .block(styles::popup(p, title))
            .render(input_area, buf);

        if matches.is_empty() {
            return;
        }
        let items: Vec<ListItem> = matches
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(|tag| {
                ListItem::new(Line::from(vec![
                    Span::raw(" "),
                    styles::tag_bullet(&self.colors, tag),
                    Span::raw(" "),
                    Span::styled(tag.to_string(), styles::text(p)),
                ]))
            })
            .collect();
        Clear.render(list_area, buf);
        let list = List::new(items).highlight_style(styles::selected(p));
        let mut state = ListState::default().with_selected(selector.suggestion);
        StatefulWidget::render(list, list_area, buf, &mut state);
    }

    fn handle_key(&self, scope: &Scope<'_>, key: InputKey) -> bool {
        let Some(selector) = Self::selector(scope) else {
            return false;
        };
        let actions = &scope.props.actions;
        let selected = Self::selected(scope, selector);

        match key {
            InputKey::Esc => actions.close_tags_selector(),
            InputKey::Up => actions.move_tags_suggestion(-1),
            InputKey::Down => actions.move_tags_suggestion(1),
            InputKey::Enter | InputKey::Tab => {
                let highlighted = selector.suggestion.and_then(|i| {
                    suggestions(Self::known_tags(scope), &selected, &selector.input)
                        .get(i)
                        .map(|s| s.to_string())
                });
                match highlighted {
                    Some(tag) => Self::commit(scope, selector, &selected, &tag),
                    None if selector.input.trim().is_empty() && key == InputKey::Enter => {
                        actions.close_tags_selector()
                    }
                    None => Self::commit(scope, selector, &selected, &selector.input),
                }
            }
            InputKey::Char(c) if TAG_DELIMITERS.contains(&c) => {
                Self::commit(scope, selector, &selected, &selector.input)
            }
            InputKey::Backspace if selector.input.is_empty() => {
                if selected.is_empty() {
                    return true;
                }
                Self::change(scope, selector, remove_tag(&selected, selected.len() - 1))
            }
            InputKey::Backspace => {
                let mut input = selector.input.clone();
                input.pop();
                actions.edit_tags_input(input)
            }
            InputKey::Char(c) => {
                let mut input = selector.input.clone();
                input.push(c);
                actions.edit_tags_input(input)
            }
            // The selector owns the keyboard while open
            _ => true,
        }
    }

    fn on_mount(&self, scope: &Scope<'_>) {
        let Some(mount) = Self::selector(scope).map(|s| s.mount) else {
            return;
        };
        *self.mounted.lock().unwrap_or_else(|e| e.into_inner()) = Some(mount);
        scope.props.actions.list_selector_tags(mount);
    }

    fn on_unmount(&self, scope: &Scope<'_>) {
        let mounted = self
            .mounted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(mount) = mounted {
            scope.props.actions.release_tags_selector(mount);
        }
    }
}
