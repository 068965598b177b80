//! File IO helpers: load a document from disk and save it back.
//!
//! Synchronous and single-shot: no retries, no background IO. Loading expands
//! every tab to four spaces before the chunks are built; saving collapses
//! every run of four spaces back into a tab. The transform is lossy (an
//! original run of four spaces comes back as a tab) but `load -> save -> load`
//! is stable.

use core_state::{Document, EditorState};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

pub const TAB_WIDTH_TEXT: &str = "    ";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no file name")]
    NoPath,
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Tabs to four spaces.
pub fn expand_tabs(text: &str) -> String {
    text.replace('\t', TAB_WIDTH_TEXT)
}

/// Every run of four spaces (scanning left to right) to a tab.
pub fn collapse_spaces(text: &str) -> String {
    text.replace(TAB_WIDTH_TEXT, "\t")
}

/// Read `path` into a new document with `chunk_size`-bounded chunks.
pub fn load_document(path: &Path, chunk_size: usize) -> Result<Document, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| {
        error!(target: "io", path = %path.display(), ?source, "file_open_error");
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let text = String::from_utf8(bytes).map_err(|e| {
        error!(
            target: "io",
            path = %path.display(),
            valid_up_to = e.utf8_error().valid_up_to(),
            "file_not_utf8"
        );
        LoadError::InvalidUtf8 {
            path: path.to_path_buf(),
        }
    })?;
    let doc = Document::from_text(&expand_tabs(&text), chunk_size);
    info!(
        target: "io",
        path = %path.display(),
        units = doc.len(),
        rows = doc.row_count(),
        chunks = doc.buffer().chunk_count(),
        "file_loaded"
    );
    Ok(doc)
}

/// Chunks in order with four-space runs collapsed to tabs.
pub fn serialize(doc: &Document) -> String {
    let joined: String = doc.buffer().chunks().collect();
    collapse_spaces(&joined)
}

/// Write the document to the file it was loaded from in one `fs::write` call.
/// Clears the dirty flag on success; returns the number of bytes written.
pub fn save_document(state: &mut EditorState) -> Result<usize, SaveError> {
    let Some(path) = state.file_name.clone() else {
        return Err(SaveError::NoPath);
    };
    let content = serialize(&state.document);
    if let Err(source) = std::fs::write(&path, content.as_bytes()) {
        error!(target: "io", path = %path.display(), ?source, "file_write_error");
        return Err(SaveError::Io { path, source });
    }
    state.dirty = false;
    info!(target: "io", path = %path.display(), bytes = content.len(), "file_written");
    Ok(content.len())
}
