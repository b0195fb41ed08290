//! Fallback for locations no route matches

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;

use shlink_app::connect::{connect, Connect};

use crate::component::{Scope, View};
use crate::theme::styles;

pub struct NotFound;

impl NotFound {
    pub fn connection() -> Connect {
        connect(&[], &[])
    }
}

impl View for NotFound {
    fn name(&self) -> &'static str {
        "NotFound"
    }

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer) {
        let p = scope.palette;
        let lines = vec![
            Line::styled("Oops! We could not find requested route.", styles::error(p)),
            Line::raw(""),
            Line::styled(
                "Go back to the servers list and pick one from there.",
                styles::text_secondary(p),
            ),
            Line::from(styles::hint(p, "g", "Home")),
        ];
        super::render_message(lines, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use shlink_app::connect::Props;

    #[test]
    fn test_renders_message() {
        let mut term = TestTerminal::with_size(120, 10);
        term.render_view(&NotFound, Props::default());
        assert!(term.buffer_contains("could not find requested route"));
        assert!(term.buffer_contains("[g] Home"));
    }
}
