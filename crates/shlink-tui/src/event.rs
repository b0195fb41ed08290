//! Terminal event polling

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use shlink_app::InputKey;
use shlink_core::prelude::*;

/// Poll interval of the event loop
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What the terminal reported during one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(InputKey),
    Resize,
    /// Nothing happened within the poll interval
    Idle,
}

/// Map a key press to an [`InputKey`]. Releases, repeats and keys with no
/// binding yield `None`.
pub fn to_input_key(key: KeyEvent) -> Option<InputKey> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let input = match key.code {
        KeyCode::Char(c) if ctrl => InputKey::CharCtrl(c.to_ascii_lowercase()),
        KeyCode::Char(c) => InputKey::Char(c),
        KeyCode::Tab if shift => InputKey::BackTab,
        KeyCode::Tab => InputKey::Tab,
        KeyCode::BackTab => InputKey::BackTab,
        KeyCode::Enter => InputKey::Enter,
        KeyCode::Esc => InputKey::Esc,
        KeyCode::Backspace => InputKey::Backspace,
        KeyCode::Delete => InputKey::Delete,
        KeyCode::Up => InputKey::Up,
        KeyCode::Down => InputKey::Down,
        KeyCode::Left => InputKey::Left,
        KeyCode::Right => InputKey::Right,
        KeyCode::Home => InputKey::Home,
        KeyCode::End => InputKey::End,
        KeyCode::PageUp => InputKey::PageUp,
        KeyCode::PageDown => InputKey::PageDown,
        KeyCode::F(n) => InputKey::F(n),
        _ => return None,
    };
    Some(input)
}

/// Wait up to one poll interval for the next terminal event
pub fn poll() -> Result<TerminalEvent> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(TerminalEvent::Idle);
    }
    let event = match event::read()? {
        Event::Key(key) => to_input_key(key)
            .map(TerminalEvent::Key)
            .unwrap_or(TerminalEvent::Idle),
        Event::Resize(..) => TerminalEvent::Resize,
        _ => TerminalEvent::Idle,
    };
    Ok(event)
}
