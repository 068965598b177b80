//! Text edit action handling.
//!
//! Every mutation goes through `core_state::Document`, which patches the row
//! index in the same call, then the cursor is placed from the returned
//! position. Insert/newline/backspace apply only in Edit mode; `x` and `dd`
//! only in Navigation mode.

use super::DispatchResult;
use crate::EditKind;
use core_model::View;
use core_state::{EditorState, Mode};
use tracing::trace;

pub(crate) fn handle_edit(
    kind: EditKind,
    state: &mut EditorState,
    view: &mut View,
) -> DispatchResult {
    let allowed = match kind {
        EditKind::InsertText(_) | EditKind::InsertNewline | EditKind::Backspace => {
            state.mode == Mode::Edit
        }
        EditKind::DeleteUnder | EditKind::DeleteRow => state.mode == Mode::Navigation,
    };
    if !allowed {
        return DispatchResult::clean();
    }
    let before = view.cursor.position;
    let mut pos = before;
    let doc = &mut state.document;
    let modified = match &kind {
        EditKind::InsertText(text) => {
            insert_text(doc, &mut pos, text);
            !text.is_empty()
        }
        EditKind::InsertNewline => {
            doc.insert_newline(&mut pos);
            true
        }
        EditKind::Backspace => doc.delete_before(&mut pos),
        EditKind::DeleteUnder => doc.delete_at(pos),
        EditKind::DeleteRow => doc.delete_row(&mut pos),
    };
    trace!(
        target: "actions.dispatch",
        op = ?kind,
        row = before.row,
        column = before.column,
        to_row = pos.row,
        to_column = pos.column,
        modified,
        "edit"
    );
    if !modified {
        return DispatchResult::clean();
    }
    match kind {
        // `x` leaves the cursor (and its remembered column) where it was.
        EditKind::DeleteUnder => view.cursor.clamp(state.document.rows()),
        _ => view.cursor.set(pos),
    }
    state.dirty = true;
    DispatchResult::modified()
}

/// Insert `text`, splitting at each newline: the run before it is inserted,
/// then a new row is opened, then the remainder is handled the same way.
fn insert_text(doc: &mut core_state::Document, pos: &mut core_text::Position, text: &str) {
    let mut rest = text;
    while let Some((head, tail)) = rest.split_once('\n') {
        doc.insert(pos, head);
        doc.insert_newline(pos);
        rest = tail;
    }
    doc.insert(pos, rest);
}
