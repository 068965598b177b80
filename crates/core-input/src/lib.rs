//! Terminal input: crossterm events normalized into editor [`Event`]s.
//!
//! Printable characters (plain, shifted or with Caps Lock) become
//! [`InputEvent::Keystroke`]; named keys and anything carrying Ctrl or Alt
//! become [`InputEvent::Shortcut`]; bracketed paste arrives as one
//! [`InputEvent::Text`].

mod async_service;
pub use async_service::{AsyncInputShutdown, RepeatMode, TerminalInputSource};

use core_events::{InputEvent, KeyCode, KeyModifiers, Shortcut};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventState, KeyModifiers as CMods,
};

pub(crate) fn map_mods(m: CMods, state: KeyEventState) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if state.contains(KeyEventState::CAPS_LOCK) {
        out |= KeyModifiers::CAPS;
    }
    out
}

/// Map one crossterm key to an input event. Keys the editor has no use for
/// (function keys, Home/End, ...) map to `None`.
pub fn map_key_event(key: &CKeyEvent) -> Option<InputEvent> {
    let mods = map_mods(key.modifiers, key.state);
    let code = match key.code {
        CKeyCode::Char(c) => {
            if mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
                KeyCode::Char(c)
            } else {
                return Some(InputEvent::Keystroke(c));
            }
        }
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        _ => return None,
    };
    Some(InputEvent::Shortcut(Shortcut::new(code, mods)))
}
