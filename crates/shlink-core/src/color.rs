//! Deterministic tag color assignment
//!
//! Every tag gets a palette color derived from a hash of its lower-cased name, so
//! the same tag renders identically no matter the order in which tags are first
//! seen. Assignments and overrides are memoized for the process lifetime.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// 24-bit display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness (HSP model) above the midpoint
    pub fn is_light(&self) -> bool {
        let (r, g, b) = (self.r as f64, self.g as f64, self.b as f64);
        let brightness = (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt();
        brightness >= 128.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const TAG_PALETTE: [Color; 24] = [
    Color::rgb(0x57, 0xa0, 0xd3),
    Color::rgb(0x46, 0x82, 0xb4),
    Color::rgb(0x1e, 0x90, 0xff),
    Color::rgb(0x5f, 0x9e, 0xa0),
    Color::rgb(0x2a, 0x52, 0xbe),
    Color::rgb(0x64, 0x95, 0xed),
    Color::rgb(0x00, 0x80, 0x80),
    Color::rgb(0x20, 0xb2, 0xaa),
    Color::rgb(0x2e, 0x8b, 0x57),
    Color::rgb(0x3c, 0xb3, 0x71),
    Color::rgb(0x6b, 0x8e, 0x23),
    Color::rgb(0x9a, 0xcd, 0x32),
    Color::rgb(0xda, 0xa5, 0x20),
    Color::rgb(0xff, 0xa5, 0x00),
    Color::rgb(0xff, 0x7f, 0x50),
    Color::rgb(0xcd, 0x5c, 0x5c),
    Color::rgb(0xdc, 0x14, 0x3c),
    Color::rgb(0xc7, 0x15, 0x85),
    Color::rgb(0xda, 0x70, 0xd6),
    Color::rgb(0x93, 0x70, 0xdb),
    Color::rgb(0x8a, 0x2b, 0xe2),
    Color::rgb(0x6a, 0x5a, 0xcd),
    Color::rgb(0x70, 0x80, 0x90),
    Color::rgb(0xa0, 0x52, 0x2d),
];

/// FNV-1a 64-bit
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(PRIME)
    })
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Session-wide tag color service, shared behind an `Arc`
#[derive(Debug, Default)]
pub struct ColorGenerator {
    colors: Mutex<HashMap<String, Color>>,
}

impl ColorGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for_key(&self, key: &str) -> Color {
        let key = normalize_key(key);
        let mut colors = self.colors.lock().unwrap_or_else(|e| e.into_inner());
        *colors.entry(key).or_insert_with_key(|k| {
            let index = (fnv1a(k.as_bytes()) % TAG_PALETTE.len() as u64) as usize;
            TAG_PALETTE[index]
        })
    }

    /// Pin a color for a key, replacing the derived one
    pub fn set_color_for_key(&self, key: &str, color: Color) -> Color {
        let mut colors = self.colors.lock().unwrap_or_else(|e| e.into_inner());
        colors.insert(normalize_key(key), color);
        color
    }

    pub fn is_color_light_for_key(&self, key: &str) -> bool {
        self.color_for_key(key).is_light()
    }

    /// Number of memoized keys
    pub fn len(&self) -> usize {
        self.colors.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_for_key_is_idempotent() {
        let generator = ColorGenerator::new();
        for name in ["foo", "bar", "a-very-long-tag-name", "", "ünïcödé"] {
            let first = generator.color_for_key(name);
            for _ in 0..5 {
                assert_eq!(generator.color_for_key(name), first);
            }
        }
    }

    #[test]
    fn test_assignment_independent_of_call_order() {
        let forward = ColorGenerator::new();
        let backward = ColorGenerator::new();
        let names = ["one", "two", "three", "four", "five"];

        let a: Vec<Color> = names.iter().map(|n| forward.color_for_key(n)).collect();
        let mut b: Vec<Color> = names
            .iter()
            .rev()
            .map(|n| backward.color_for_key(n))
            .collect();
        b.reverse();

        assert_eq!(a, b);
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let generator = ColorGenerator::new();
        assert_eq!(
            generator.color_for_key("Rust"),
            generator.color_for_key("rust")
        );
        assert_eq!(generator.len(), 1);
    }

    #[test]
    fn test_override_wins() {
        let generator = ColorGenerator::new();
        let pinned = Color::rgb(1, 2, 3);
        generator.set_color_for_key("foo", pinned);
        assert_eq!(generator.color_for_key("foo"), pinned);
    }

    #[test]
    fn test_color_comes_from_palette() {
        let generator = ColorGenerator::new();
        assert!(TAG_PALETTE.contains(&generator.color_for_key("anything")));
    }

    #[test]
    fn test_display_and_lightness() {
        let color = Color::rgb(0xff, 0xa5, 0x00);
        assert_eq!(color.to_string(), "#ffa500");
        assert!(color.is_light());
        assert!(!Color::rgb(0x00, 0x00, 0x80).is_light());
    }
}
