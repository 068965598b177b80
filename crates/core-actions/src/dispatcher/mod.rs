//! Dispatcher applying `Action` to the editor model.
//!
//! Sub-modules:
//! * `motion` - cursor movement and scrolling
//! * `mode`   - Navigation <-> Edit transitions
//! * `edit`   - text mutation
//!
//! One action is applied to completion per call. Afterwards the cursor is
//! clamped into the row index and the viewport follows the cursor row, so the
//! model invariants hold between any two calls.

use crate::{Action, io_ops, io_ops::SaveError};
use core_model::EditorModel;

mod edit;
mod mode;
mod motion;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Something visible changed; a render is needed.
    pub dirty: bool,
    pub quit: bool,
    /// The document text changed.
    pub modified: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            modified: false,
        }
    }
    pub fn modified() -> Self {
        Self {
            dirty: true,
            quit: false,
            modified: true,
        }
    }
}

/// Apply an action to the model. Only `Action::Save` can fail.
pub fn dispatch(action: Action, model: &mut EditorModel) -> Result<DispatchResult, SaveError> {
    let (state, view) = model.split_state_and_view();
    tracing::trace!(
        target: "actions.dispatch",
        ?action,
        mode = state.mode.display_name(),
        "dispatch"
    );
    let mut result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, state, view),
        Action::Scroll(delta) => motion::handle_scroll(delta, state, view),
        Action::ModeChange(mc) => mode::handle_mode_change(mc, state),
        Action::Edit(kind) => edit::handle_edit(kind, state, view),
        Action::Save => {
            let bytes = io_ops::save_document(state)?;
            state.set_status(format!("written {bytes} bytes"));
            DispatchResult::dirty()
        }
        Action::Quit => DispatchResult::quit(),
    };
    if view.settle(state) {
        result.dirty = true;
    }
    debug_assert!(view.cursor.is_valid(state.document.rows()), "cursor escaped the document");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditKind, ModeChange, MotionKind};
    use core_state::{Document, EditorState, Mode};
    use core_text::Position;

    fn model(text: &str) -> EditorModel {
        EditorModel::new(EditorState::new(Document::from_text(text, 100)), 10)
    }

    fn run(m: &mut EditorModel, action: Action) -> DispatchResult {
        dispatch(action, m).expect("dispatch")
    }

    #[test]
    fn motion_reports_dirty_only_when_moving() {
        let mut m = model("ab\ncd");
        assert!(run(&mut m, Action::Motion(MotionKind::Right)).dirty);
        assert!(!run(&mut m, Action::Motion(MotionKind::Up)).dirty);
        assert!(run(&mut m, Action::Motion(MotionKind::Down)).dirty);
        assert_eq!(m.view().cursor.position, Position::new(1, 1));
    }

    #[test]
    fn edits_ignored_in_wrong_mode() {
        let mut m = model("abc");
        let r = run(&mut m, Action::Edit(EditKind::InsertText("x".into())));
        assert_eq!(r, DispatchResult::clean());
        run(&mut m, Action::ModeChange(ModeChange::EnterEdit));
        let r = run(&mut m, Action::Edit(EditKind::DeleteUnder));
        assert_eq!(r, DispatchResult::clean());
        assert_eq!(m.state().document.text(), "abc");
        assert!(!m.state().dirty);
    }

    #[test]
    fn insert_text_sets_dirty_flag() {
        let mut m = model("abc");
        run(&mut m, Action::ModeChange(ModeChange::EnterEdit));
        assert_eq!(m.state().mode, Mode::Edit);
        let r = run(&mut m, Action::Edit(EditKind::InsertText("x".into())));
        assert!(r.modified);
        assert!(m.state().dirty);
        assert_eq!(m.state().document.text(), "xabc");
        assert_eq!(m.view().cursor.position, Position::new(0, 1));
    }

    #[test]
    fn save_without_path_is_an_error() {
        let mut m = model("abc");
        assert!(matches!(dispatch(Action::Save, &mut m), Err(SaveError::NoPath)));
    }

    #[test]
    fn quit_is_reported() {
        let mut m = model("");
        assert!(run(&mut m, Action::Quit).quit);
    }

    #[test]
    fn viewport_follows_cursor_after_motion() {
        let text: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        let doc = Document::from_text(&text.join("\n"), 100);
        let mut m = EditorModel::new(EditorState::new(doc), 5);
        run(&mut m, Action::Motion(MotionKind::LastRow));
        assert_eq!(m.view().cursor.row(), 29);
        assert_eq!(m.view().viewport.scroll_offset, 25);
        run(&mut m, Action::Motion(MotionKind::FirstRow));
        assert_eq!(m.view().viewport.scroll_offset, 0);
    }

    #[test]
    fn scroll_drags_cursor_into_view() {
        let text: Vec<String> = (0..10).map(|i| format!("row{i}")).collect();
        let doc = Document::from_text(&text.join("\n"), 100);
        let mut m = EditorModel::new(EditorState::new(doc), 3);
        run(&mut m, Action::Motion(MotionKind::RowEnd));
        assert!(run(&mut m, Action::Scroll(1)).dirty);
        assert_eq!(m.view().viewport.scroll_offset, 1);
        assert_eq!(m.view().cursor.position, Position::new(1, 4));
        run(&mut m, Action::Scroll(1));
        run(&mut m, Action::Scroll(1));
        assert_eq!(m.view().cursor.row(), 3);
        assert!(run(&mut m, Action::Scroll(-1)).dirty);
        assert_eq!(m.view().viewport.scroll_offset, 2);
        assert_eq!(m.view().cursor.row(), 3, "still visible, not dragged");
        assert!(run(&mut m, Action::Scroll(-5)).dirty);
        assert_eq!(m.view().viewport.scroll_offset, 0);
        assert_eq!(m.view().cursor.row(), 2);
    }
}
