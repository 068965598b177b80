//! KeyTranslator: stateful input -> `Action` translation.
//!
//! Shortcuts are handled the same way in both modes:
//! * `Ctrl+S` save, `Ctrl+Q` quit;
//! * `Esc` returns to Navigation;
//! * arrows move the cursor.
//!
//! Edit mode additionally maps `Enter`, `Backspace` and `Tab` (four spaces),
//! and inserts printable keystrokes literally. Pasted text is inserted with
//! its line breaks normalized and its tabs expanded, the same way a loaded
//! file is. In Navigation mode printable
//! keystrokes accumulate in the [`PendingCommand`] and are resolved against
//! the command table after every key. Any shortcut or mode change clears the
//! pending buffer.

use crate::io_ops::{TAB_WIDTH_TEXT, expand_tabs};
use crate::{Action, EditKind, ModeChange, MotionKind};
use core_events::{InputEvent, KeyCode, KeyModifiers, Shortcut};
use core_keymap::{Command, CommandTrie, PendingCommand, Resolution};
use core_state::Mode;
use tracing::{debug, trace};

/// Text inserted by `Tab` in Edit mode.
pub const TAB_TEXT: &str = TAB_WIDTH_TEXT;

#[derive(Debug, Default)]
pub struct KeyTranslator {
    table: CommandTrie,
    pending: PendingCommand,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unresolved Navigation-mode keys, for the status line.
    pub fn pending(&self) -> String {
        self.pending.to_string()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }

    pub fn translate(&mut self, mode: Mode, event: &InputEvent) -> Option<Action> {
        let action = match event {
            InputEvent::Keystroke(c) => self.keystroke(mode, *c),
            InputEvent::Shortcut(s) => self.shortcut(mode, s),
            InputEvent::Text(text) => match mode {
                Mode::Edit => {
                    let text = expand_tabs(&normalize_newlines(text));
                    Some(Action::Edit(EditKind::InsertText(text)))
                }
                Mode::Navigation => {
                    debug!(target: "input.map", len = text.len(), "text_ignored_in_navigation");
                    None
                }
            },
        };
        trace!(target: "input.map", mode = mode.display_name(), ?action, "translate");
        action
    }

    fn keystroke(&mut self, mode: Mode, c: char) -> Option<Action> {
        match mode {
            Mode::Edit => Some(Action::Edit(EditKind::InsertText(c.to_string()))),
            Mode::Navigation => match self.pending.push(c, &self.table) {
                Resolution::Exact(cmd) => Some(command_action(cmd)),
                Resolution::Prefix | Resolution::NoMatch => None,
            },
        }
    }

    fn shortcut(&mut self, mode: Mode, s: &Shortcut) -> Option<Action> {
        // A printable key without Ctrl/Alt is a keystroke, whatever the
        // producer called it.
        if let Some(c) = s.ch
            && !s.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT)
        {
            return self.keystroke(mode, c);
        }
        self.pending.clear();
        if s.has_ctrl() {
            return match s.code {
                KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Save),
                KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
                _ => None,
            };
        }
        match (s.code, mode) {
            (KeyCode::Esc, _) => Some(Action::ModeChange(ModeChange::LeaveEdit)),
            (KeyCode::Left, _) => Some(Action::Motion(MotionKind::Left)),
            (KeyCode::Right, _) => Some(Action::Motion(MotionKind::Right)),
            (KeyCode::Up, _) => Some(Action::Motion(MotionKind::Up)),
            (KeyCode::Down, _) => Some(Action::Motion(MotionKind::Down)),
            (KeyCode::Enter, Mode::Edit) => Some(Action::Edit(EditKind::InsertNewline)),
            (KeyCode::Backspace, Mode::Edit) => Some(Action::Edit(EditKind::Backspace)),
            (KeyCode::Tab, Mode::Edit) => {
                Some(Action::Edit(EditKind::InsertText(TAB_TEXT.to_string())))
            }
            _ => None,
        }
    }
}

fn command_action(cmd: Command) -> Action {
    match cmd {
        Command::MoveLeft => Action::Motion(MotionKind::Left),
        Command::MoveRight => Action::Motion(MotionKind::Right),
        Command::MoveDown => Action::Motion(MotionKind::Down),
        Command::MoveUp => Action::Motion(MotionKind::Up),
        Command::WordForward => Action::Motion(MotionKind::WordForward),
        Command::WordBackward => Action::Motion(MotionKind::WordBackward),
        Command::EnterEdit => Action::ModeChange(ModeChange::EnterEdit),
        Command::FirstRow => Action::Motion(MotionKind::FirstRow),
        Command::LastRow => Action::Motion(MotionKind::LastRow),
        Command::RowStart => Action::Motion(MotionKind::RowStart),
        Command::RowEnd => Action::Motion(MotionKind::RowEnd),
        Command::DeleteUnder => Action::Edit(EditKind::DeleteUnder),
        Command::DeleteRow => Action::Edit(EditKind::DeleteRow),
        Command::ScrollUp => Action::Scroll(-1),
        Command::ScrollDown => Action::Scroll(1),
    }
}

/// Pasted text may carry `\r\n` or bare `\r` line breaks.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
