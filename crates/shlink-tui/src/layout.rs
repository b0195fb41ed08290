//! Screen layout definitions for the TUI
//!
//! Header, optional update banner, the routed body and the footer line.

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Brand, identity and server switcher hint
    pub header: Rect,

    /// Update banner, zero height when no update is pending
    pub banner: Rect,

    /// Routed content
    pub body: Rect,

    /// Versions and notices
    pub footer: Rect,
}

/// Split the terminal into the main screen areas
pub fn create(area: Rect, show_banner: bool) -> ScreenAreas {
    let banner_height = if show_banner { 1 } else { 0 };

    let chunks = Layout::vertical([
        Constraint::Length(3),             // Header (bordered)
        Constraint::Length(banner_height), // Update banner
        Constraint::Min(3),                // Body
        Constraint::Length(1),             // Footer
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        banner: chunks[1],
        body: chunks[2],
        footer: chunks[3],
    }
}

/// Rect of `width` x `height` centered in `area`, clipped to it
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Rect hanging below the header at its right edge, used by the servers dropdown
pub fn dropdown(header: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(header.width);
    Rect {
        x: header.x + header.width - width,
        y: header.y + header.height.saturating_sub(1),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_without_banner() {
        let layout = create(Rect::new(0, 0, 80, 24), false);

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.banner.height, 0);
        assert_eq!(layout.body.y, 3);
        assert_eq!(layout.body.height, 20); // 24 - 3 - 1
        assert_eq!(layout.footer.y, 23);
    }

    #[test]
    fn test_layout_with_banner() {
        let layout = create(Rect::new(0, 0, 80, 24), true);

        assert_eq!(layout.banner.height, 1);
        assert_eq!(layout.banner.y, 3);
        assert_eq!(layout.body.y, 4);
        assert_eq!(layout.body.height, 19);
    }

    #[test]
    fn test_centered_is_clipped() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered(area, 20, 4);
        assert_eq!(rect, Rect::new(10, 3, 20, 4));

        let rect = centered(area, 100, 100);
        assert_eq!(rect, area);
    }

    #[test]
    fn test_dropdown_right_aligned() {
        let header = Rect::new(0, 0, 80, 3);
        let rect = dropdown(header, 30, 5);
        assert_eq!(rect.x, 50);
        assert_eq!(rect.y, 2);
    }
}
