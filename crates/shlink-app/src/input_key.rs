//! Terminal-independent key events.
//!
//! Components receive `InputKey` values instead of crossterm events so that the
//! state crate stays usable without a terminal (tests, headless tooling).

/// Abstract key press, converted from `crossterm::event::KeyEvent` in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held (Ctrl+c, Ctrl+u, ...)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,

    /// Function key (F1-F12)
    F(u8),
}

impl InputKey {
    /// Ctrl+C always quits, whatever has focus
    pub fn is_interrupt(&self) -> bool {
        matches!(self, InputKey::CharCtrl('c'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_key_equality() {
        assert_eq!(InputKey::Char('a'), InputKey::Char('a'));
        assert_ne!(InputKey::CharCtrl('c'), InputKey::Char('c'));
    }

    #[test]
    fn test_is_interrupt() {
        assert!(InputKey::CharCtrl('c').is_interrupt());
        assert!(!InputKey::Char('c').is_interrupt());
    }
}
