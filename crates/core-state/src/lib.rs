//! Editor state: the document, the current mode, and file metadata.
//!
//! View concerns (cursor, preferred column, scroll) live in `core-model`; this
//! crate is document-centric. All text mutation funnels through
//! [`Document`], which keeps the chunked buffer and the row index in step.

pub mod document;

pub use core_text::Position;
pub use document::Document;

use std::path::PathBuf;

/// Input mode of the command engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keystrokes are commands (`h j k l w b i gg G 0 $ x dd [ ]`).
    #[default]
    Navigation,
    /// Keystrokes are inserted as text.
    Edit,
}

impl Mode {
    /// Short label for the status line.
    pub fn display_name(self) -> &'static str {
        match self {
            Mode::Navigation => "NAV",
            Mode::Edit => "EDIT",
        }
    }
}

#[derive(Debug)]
pub struct EditorState {
    pub document: Document,
    pub mode: Mode,
    pub file_name: Option<PathBuf>,
    /// Set by any buffer mutation; cleared by a successful save.
    pub dirty: bool,
    /// One-shot status text (save result, errors); cleared on the next key.
    pub status: Option<String>,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            mode: Mode::default(),
            file_name: None,
            dirty: false,
            status: None,
        }
    }

    pub fn with_file(document: Document, path: PathBuf) -> Self {
        let mut state = Self::new(document);
        state.file_name = Some(path);
        state
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::trace!(
                target: "state.edit",
                from = self.mode.display_name(),
                to = mode.display_name(),
                "mode_change"
            );
            self.mode = mode;
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(text.into());
    }
}
