//! Color palettes for the light and dark themes.

use ratatui::style::Color;

use shlink_app::config::ResolvedTheme;

/// Named colors every widget draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    // --- Background layers ---
    pub background: Color,
    pub surface: Color,
    pub popup: Color,

    // --- Borders ---
    pub border: Color,
    pub border_active: Color,

    // --- Accent ---
    pub brand: Color,
    pub accent: Color,
    /// Foreground on top of `accent`
    pub contrast: Color,

    // --- Text ---
    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // --- Status ---
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

pub const DARK: Palette = Palette {
    background: Color::Rgb(16, 18, 24),
    surface: Color::Rgb(24, 28, 36),
    popup: Color::Rgb(34, 40, 52),
    border: Color::Rgb(60, 68, 80),
    border_active: Color::Rgb(70, 150, 220),
    brand: Color::Rgb(70, 150, 220),
    accent: Color::Rgb(70, 150, 220),
    contrast: Color::Rgb(10, 12, 16),
    text: Color::Rgb(214, 220, 228),
    text_secondary: Color::Rgb(150, 158, 170),
    text_muted: Color::Rgb(96, 104, 116),
    success: Color::Rgb(40, 180, 120),
    error: Color::Rgb(230, 80, 90),
    warning: Color::Rgb(230, 180, 40),
    info: Color::Rgb(90, 190, 240),
};

pub const LIGHT: Palette = Palette {
    background: Color::Rgb(250, 250, 252),
    surface: Color::Rgb(240, 242, 246),
    popup: Color::Rgb(228, 232, 238),
    border: Color::Rgb(190, 196, 206),
    border_active: Color::Rgb(30, 110, 190),
    brand: Color::Rgb(30, 110, 190),
    accent: Color::Rgb(30, 110, 190),
    contrast: Color::Rgb(255, 255, 255),
    text: Color::Rgb(30, 34, 40),
    text_secondary: Color::Rgb(80, 88, 100),
    text_muted: Color::Rgb(130, 138, 150),
    success: Color::Rgb(20, 140, 90),
    error: Color::Rgb(200, 40, 50),
    warning: Color::Rgb(170, 120, 0),
    info: Color::Rgb(20, 130, 190),
};

pub fn for_theme(theme: ResolvedTheme) -> &'static Palette {
    match theme {
        ResolvedTheme::Light => &LIGHT,
        ResolvedTheme::Dark => &DARK,
    }
}

/// Terminal color for a tag color from the color service
pub fn tag_color(color: shlink_core::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
