//! Editor model: the editor state plus its single view (cursor + viewport).
//!
//! `EditorState` owns the document; `View` owns presentation state. The
//! dispatcher needs both mutably at once, which
//! [`EditorModel::split_state_and_view`] provides as disjoint borrows.
//!
//! Invariants after every public call:
//! * the cursor satisfies `row < row_count` and `column <= row_len(row)`;
//! * the viewport offset lies in `[0, max(0, row_count - visible_height)]`.

pub mod cursor;
pub mod render;
pub mod viewport;

pub use cursor::Cursor;
pub use render::{RenderSnapshot, VisibleRow};
pub use viewport::Viewport;

use core_state::EditorState;

#[derive(Debug, Clone, Default)]
pub struct View {
    pub cursor: Cursor,
    pub viewport: Viewport,
}

impl View {
    pub fn new(visible_height: usize) -> Self {
        Self {
            cursor: Cursor::default(),
            viewport: Viewport::new(visible_height),
        }
    }

    /// Re-establish the cursor and viewport invariants against `state`'s
    /// current rows, scrolling so the cursor row is visible.
    pub fn settle(&mut self, state: &EditorState) -> bool {
        let rows = state.document.rows();
        self.cursor.clamp(rows);
        self.viewport.follow(self.cursor.row(), rows.row_count())
    }
}

#[derive(Debug)]
pub struct EditorModel {
    state: EditorState,
    view: View,
}

impl EditorModel {
    pub fn new(state: EditorState, visible_height: usize) -> Self {
        Self {
            state,
            view: View::new(visible_height),
        }
    }

    /// Test/helper constructor allowing a prepared view to be injected.
    pub fn with_view(state: EditorState, mut view: View) -> Self {
        view.settle(&state);
        Self { state, view }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Disjoint mutable borrows of the state and the view.
    pub fn split_state_and_view(&mut self) -> (&mut EditorState, &mut View) {
        (&mut self.state, &mut self.view)
    }

    /// Resize the viewport (terminal resize), keeping the cursor visible.
    pub fn set_visible_height(&mut self, height: usize) {
        let rows = self.state.document.row_count();
        self.view.viewport.set_visible_height(height, rows);
        self.view.settle(&self.state);
    }

    /// Build the render contract for one refresh. `pending` is the
    /// unresolved command text owned by the key translator.
    pub fn snapshot(&self, pending: &str) -> RenderSnapshot {
        let doc = &self.state.document;
        let range = self.view.viewport.visible_rows(doc.row_count());
        let rows = range
            .map(|index| {
                let row = doc.rows().row(index);
                VisibleRow::new(index, row.start, row.len, doc.row_text(index))
            })
            .collect();
        RenderSnapshot {
            rows,
            cursor: self.view.cursor.position,
            scroll_offset: self.view.viewport.scroll_offset,
            mode: self.state.mode,
            pending: pending.to_string(),
            file_name: self
                .state
                .file_name
                .as_ref()
                .map(|p| p.display().to_string()),
            dirty: self.state.dirty,
            status: self.state.status.clone(),
        }
    }
}
