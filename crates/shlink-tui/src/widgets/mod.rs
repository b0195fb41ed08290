//! Views rendered by the connected component tree

mod app;
mod app_update_banner;
mod create_short_url;
mod home;
mod main_header;
mod manage_servers;
mod not_found;
mod server_form;
mod server_view;
mod servers_dropdown;
mod settings;
mod short_urls_table;
mod tags_list;
mod tags_selector;
mod versions_footer;

pub use app::{App, AppParts};
pub use app_update_banner::AppUpdateBanner;
pub use create_short_url::CreateShortUrlForm;
pub use home::Home;
pub use main_header::MainHeader;
pub use manage_servers::ManageServers;
pub use not_found::NotFound;
pub use server_form::ServerForm;
pub use server_view::ServerView;
pub use servers_dropdown::ServersDropdown;
pub use settings::{next_default_ordering, SettingsView};
pub use short_urls_table::{column_titles, ShortUrlsTable};
pub use tags_list::TagsListView;
pub use tags_selector::TagsSelector;
pub use versions_footer::VersionsFooter;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to `max` display columns, ending with `…` when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max - 1 {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Centered lines in `area`, used for empty and error states
pub(crate) fn render_message(lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let inner = Rect {
        y: area.y + top,
        height: area.height - top,
        ..area
    };
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate("https://example.com/long", 10), "https://e…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_truncate_counts_wide_chars() {
        // Each CJK char is two columns wide
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
    }
}
