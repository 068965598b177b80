//! Modal command engine: key translation, action dispatch and file IO.
//!
//! Input flows `InputEvent -> KeyTranslator -> Action -> dispatch`. The
//! translator owns the Navigation-mode pending command buffer; the dispatcher
//! applies one action at a time to an [`EditorModel`](core_model::EditorModel)
//! and re-establishes the cursor and viewport invariants before returning.
//! [`EditorSession`] bundles the pieces for the runtime and for tests.

pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;
pub mod session;

pub use dispatcher::{DispatchResult, dispatch};
pub use io_ops::{LoadError, SaveError, load_document, save_document};
pub use key_translator::KeyTranslator;
pub use session::EditorSession;

/// Cursor motions shared by the command table and the arrow shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    WordForward,
    WordBackward,
    FirstRow,
    LastRow,
    RowStart,
    RowEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    EnterEdit,
    LeaveEdit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    /// Literal text; embedded newlines split rows.
    InsertText(String),
    InsertNewline,
    /// Delete the unit before the cursor, merging rows at column 0.
    Backspace,
    /// `x`
    DeleteUnder,
    /// `dd`
    DeleteRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    /// Scroll the viewport by the given number of rows.
    Scroll(isize),
    ModeChange(ModeChange),
    Edit(EditKind),
    Save,
    Quit,
}
