//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders};

use shlink_core::ColorGenerator;

use super::palette::{self, Palette};

// --- Text styles ---
pub fn text(p: &Palette) -> Style {
    Style::default().fg(p.text)
}

pub fn text_secondary(p: &Palette) -> Style {
    Style::default().fg(p.text_secondary)
}

pub fn text_muted(p: &Palette) -> Style {
    Style::default().fg(p.text_muted)
}

// --- Accent styles ---
pub fn accent(p: &Palette) -> Style {
    Style::default().fg(p.accent)
}

pub fn accent_bold(p: &Palette) -> Style {
    Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
}

pub fn brand(p: &Palette) -> Style {
    Style::default().fg(p.brand).add_modifier(Modifier::BOLD)
}

// --- Status styles ---
pub fn success(p: &Palette) -> Style {
    Style::default().fg(p.success)
}

pub fn error(p: &Palette) -> Style {
    Style::default().fg(p.error)
}

pub fn warning(p: &Palette) -> Style {
    Style::default().fg(p.warning)
}

/// Key letter inside a `[k] Label` hint
pub fn keybinding(p: &Palette) -> Style {
    Style::default().fg(p.warning)
}

/// Selected row or focused item
pub fn selected(p: &Palette) -> Style {
    Style::default()
        .fg(p.contrast)
        .bg(p.accent)
        .add_modifier(Modifier::BOLD)
}

// --- Block builders ---
pub fn panel(p: &Palette, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            p.border_active
        } else {
            p.border
        }))
        .style(Style::default().bg(p.surface))
}

pub fn popup<'a>(p: &Palette, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.border_active))
        .style(Style::default().bg(p.popup))
}

// --- Hints ---

/// `[k] Label ` spans
pub fn hint<'a>(p: &Palette, key: &'a str, label: &'a str) -> Vec<Span<'a>> {
    vec![
        Span::styled("[", text_muted(p)),
        Span::styled(key, keybinding(p)),
        Span::styled("] ", text_muted(p)),
        Span::styled(label, text_muted(p)),
        Span::raw("  "),
    ]
}

// --- Tags ---

/// Tag name on its deterministic background color
pub fn tag_chip<'a>(colors: &ColorGenerator, tag: &'a str) -> Span<'a> {
    let bg = palette::tag_color(colors.color_for_key(tag));
    let fg = if colors.is_color_light_for_key(tag) {
        ratatui::style::Color::Black
    } else {
        ratatui::style::Color::White
    };
    Span::styled(format!(" {tag} "), Style::default().fg(fg).bg(bg))
}

/// Colored bullet used in tag lists
pub fn tag_bullet(colors: &ColorGenerator, tag: &str) -> Span<'static> {
    Span::styled(
        "●",
        Style::default().fg(palette::tag_color(colors.color_for_key(tag))),
    )
}
