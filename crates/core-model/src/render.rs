//! Read-only render contract.
//!
//! A presentation layer calls [`EditorModel::snapshot`](crate::EditorModel::snapshot)
//! once per refresh and draws from the returned value; nothing here can
//! mutate the session.

use core_state::Mode;
use core_text::{Position, motion::heading_level};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    /// Row index in the document.
    pub index: usize,
    /// Buffer offset of the row's first unit.
    pub start: usize,
    pub len: usize,
    pub text: String,
    /// Markdown heading level (1..=6) when the row starts with `#`s.
    pub heading: Option<u8>,
}

impl VisibleRow {
    pub(crate) fn new(index: usize, start: usize, len: usize, text: String) -> Self {
        let heading = heading_level(&text);
        Self {
            index,
            start,
            len,
            text,
            heading,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub rows: Vec<VisibleRow>,
    pub cursor: Position,
    pub scroll_offset: usize,
    pub mode: Mode,
    pub pending: String,
    pub file_name: Option<String>,
    pub dirty: bool,
    pub status: Option<String>,
}

impl RenderSnapshot {
    /// Cursor row relative to the top of the viewport.
    pub fn cursor_screen_row(&self) -> usize {
        self.cursor.row.saturating_sub(self.scroll_offset)
    }

    /// `NAV  notes.md [+]  dd`
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "{}  {}",
            self.mode.display_name(),
            self.file_name.as_deref().unwrap_or("[No Name]")
        );
        if self.dirty {
            line.push_str(" [+]");
        }
        if !self.pending.is_empty() {
            line.push_str("  ");
            line.push_str(&self.pending);
        }
        if let Some(status) = &self.status {
            line.push_str("  ");
            line.push_str(status);
        }
        line.push_str(&format!("  {}:{}", self.cursor.row + 1, self.cursor.column + 1));
        line
    }
}
