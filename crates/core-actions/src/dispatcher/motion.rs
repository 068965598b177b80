//! Motion sub-dispatch (cursor movement and scrolling).
//!
//! Horizontal and word motions update the preferred column; vertical motions
//! (`j`, `k`, `gg`, `G`, arrows) keep it.

use super::DispatchResult;
use crate::MotionKind;
use core_model::View;
use core_state::EditorState;

pub(crate) fn handle_motion(
    kind: MotionKind,
    state: &EditorState,
    view: &mut View,
) -> DispatchResult {
    let doc = &state.document;
    let rows = doc.rows();
    let cursor = &mut view.cursor;
    let moved = match kind {
        MotionKind::Left => cursor.move_x(-1, rows),
        MotionKind::Right => cursor.move_x(1, rows),
        MotionKind::Up => cursor.move_y(-1, rows),
        MotionKind::Down => cursor.move_y(1, rows),
        MotionKind::WordForward => cursor.word_forward(doc),
        MotionKind::WordBackward => cursor.word_backward(doc),
        MotionKind::FirstRow => cursor.goto_row(0, rows),
        MotionKind::LastRow => cursor.goto_row(rows.row_count() - 1, rows),
        MotionKind::RowStart => cursor.row_start(rows),
        MotionKind::RowEnd => cursor.row_end(rows),
    };
    tracing::trace!(
        target: "actions.dispatch",
        op = ?kind,
        row = view.cursor.row(),
        column = view.cursor.column(),
        moved,
        "motion"
    );
    if moved {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

/// Scroll by `delta` rows, then drag the cursor row into the visible window
/// with a vertical move (keeping the preferred column).
pub(crate) fn handle_scroll(delta: isize, state: &EditorState, view: &mut View) -> DispatchResult {
    let rows = state.document.rows();
    let scrolled = view.viewport.scroll_by(delta, rows.row_count());
    let top = view.viewport.scroll_offset;
    let bottom = top + view.viewport.visible_height() - 1;
    let y = view.cursor.row();
    if y < top {
        view.cursor.move_y((top - y) as isize, rows);
    } else if y > bottom {
        view.cursor.move_y(-((y - bottom) as isize), rows);
    }
    tracing::trace!(
        target: "actions.dispatch",
        op = "scroll",
        delta,
        offset = top,
        row = view.cursor.row(),
        "motion"
    );
    if scrolled {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
