// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use core_actions::{DispatchResult, EditorSession};
use core_events::{InputEvent, KeyCode, KeyModifiers, Shortcut};
use core_state::{Document, EditorState};
use core_text::RowIndex;

pub fn session(text: &str) -> EditorSession {
    session_with(text, 100, 50)
}

pub fn session_with(text: &str, chunk_size: usize, height: usize) -> EditorSession {
    EditorSession::new(EditorState::new(Document::from_text(text, chunk_size)), height)
}

/// Feed each char of `keys` as a printable keystroke.
pub fn type_keys(s: &mut EditorSession, keys: &str) {
    for c in keys.chars() {
        feed(s, InputEvent::Keystroke(c));
    }
}

pub fn press(s: &mut EditorSession, code: KeyCode) -> DispatchResult {
    feed(s, InputEvent::Shortcut(Shortcut::key(code)))
}

pub fn press_mod(s: &mut EditorSession, code: KeyCode, mods: KeyModifiers) -> DispatchResult {
    feed(s, InputEvent::Shortcut(Shortcut::new(code, mods)))
}

pub fn paste(s: &mut EditorSession, text: &str) -> DispatchResult {
    feed(s, InputEvent::Text(text.to_string()))
}

pub fn feed(s: &mut EditorSession, event: InputEvent) -> DispatchResult {
    let result = s.handle_input(&event).expect("input should not fail");
    assert_invariants(s);
    result
}

/// Cursor within the document, rows consistent with the buffer, chunk bound
/// respected.
pub fn assert_invariants(s: &EditorSession) {
    let doc = s.document();
    let rows = doc.rows();
    let pos = s.cursor();
    assert!(pos.row < rows.row_count(), "row {} out of {}", pos.row, rows.row_count());
    assert!(
        pos.column <= rows.row_len(pos.row),
        "column {} past row length {}",
        pos.column,
        rows.row_len(pos.row)
    );
    assert_eq!(rows, &RowIndex::rebuild(doc.buffer()), "row index drifted from buffer");
    let total: usize = rows.rows().iter().map(|r| r.len).sum();
    assert_eq!(total + rows.row_count() - 1, doc.len());
    let bound = doc.buffer().chunk_size();
    assert!(doc.buffer().chunk_lens().all(|l| l > 0 && l <= bound));
    let snap = s.snapshot();
    let max_offset = rows.row_count().saturating_sub(s.model().view().viewport.visible_height());
    assert!(snap.scroll_offset <= max_offset);
    assert!(s.model().view().viewport.contains(pos.row), "cursor row scrolled out of view");
}
