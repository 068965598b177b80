//! `EditorSession`: one editing session (model + key translator).
//!
//! The runtime feeds every input event here, one at a time; the held-key
//! repeater's events arrive through the same path and are indistinguishable
//! from the original key press.

use crate::{DispatchResult, KeyTranslator, LoadError, SaveError, dispatch, io_ops};
use core_events::InputEvent;
use core_model::{EditorModel, RenderSnapshot};
use core_state::{Document, EditorState, Mode};
use core_text::Position;
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Debug)]
pub struct EditorSession {
    model: EditorModel,
    translator: KeyTranslator,
}

impl EditorSession {
    pub fn new(state: EditorState, visible_height: usize) -> Self {
        Self {
            model: EditorModel::new(state, visible_height),
            translator: KeyTranslator::new(),
        }
    }

    /// Empty, unnamed document.
    pub fn empty(chunk_size: usize, visible_height: usize) -> Self {
        Self::new(EditorState::new(Document::new(chunk_size)), visible_height)
    }

    /// Load `path` (tabs expanded). Saving writes back to the same path.
    pub fn open(
        path: PathBuf,
        chunk_size: usize,
        visible_height: usize,
    ) -> Result<Self, LoadError> {
        let document = io_ops::load_document(&path, chunk_size)?;
        Ok(Self::new(EditorState::with_file(document, path), visible_height))
    }

    /// Translate and apply one input event. A failed save is reported in the
    /// status line and returned; the session stays usable.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<DispatchResult, SaveError> {
        let had_status = self.model.state_mut().status.take().is_some();
        let pending_before = self.translator.pending();
        let mode = self.model.state().mode;
        let mut result = match self.translator.translate(mode, event) {
            Some(action) => match dispatch(action, &mut self.model) {
                Ok(r) => r,
                Err(e) => {
                    error!(target: "actions.dispatch", error = %e, "save_failed");
                    self.model.state_mut().set_status(format!("save failed: {e}"));
                    return Err(e);
                }
            },
            None => DispatchResult::clean(),
        };
        if had_status || pending_before != self.translator.pending() {
            result.dirty = true;
        }
        debug!(
            target: "actions.dispatch",
            dirty = result.dirty,
            modified = result.modified,
            quit = result.quit,
            "input_handled"
        );
        Ok(result)
    }

    /// Terminal resize: new visible text height.
    pub fn resize(&mut self, visible_height: usize) {
        self.model.set_visible_height(visible_height);
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        self.model.snapshot(&self.translator.pending())
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    pub fn mode(&self) -> Mode {
        self.model.state().mode
    }

    pub fn cursor(&self) -> Position {
        self.model.view().cursor.position
    }

    pub fn preferred_column(&self) -> usize {
        self.model.view().cursor.preferred_column
    }

    pub fn pending(&self) -> String {
        self.translator.pending()
    }

    pub fn document(&self) -> &Document {
        &self.model.state().document
    }

    /// Rows of the document as strings.
    pub fn lines(&self) -> Vec<String> {
        let doc = self.document();
        (0..doc.row_count()).map(|r| doc.row_text(r)).collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.model.state().dirty
    }
}
