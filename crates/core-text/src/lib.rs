//! Chunked text storage and the derived row index.
//!
//! The document lives in a [`ChunkedBuffer`]: an ordered list of bounded
//! chunks whose concatenation is the full text. Editing near a location costs
//! roughly one chunk's worth of work instead of the whole document.
//!
//! [`RowIndex`] derives newline-delimited rows from the buffer once on load
//! and is then patched incrementally by the caller after every edit. The two
//! structures do not know about each other: `core-state::Document` is the only
//! place that mutates both and keeps them in lock step.
//!
//! Units: every offset and length in this crate counts `char`s (Unicode scalar
//! values). One unit is one display column; grapheme clusters are not treated
//! specially.

pub mod buffer;
pub mod motion;
pub mod rows;

pub use buffer::{ChunkedBuffer, DEFAULT_CHUNK_SIZE};
pub use rows::{Row, RowIndex};

/// A position expressed as (row index, unit column within that row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
    pub fn origin() -> Self {
        Self { row: 0, column: 0 }
    }
    /// Clamp into `rows`: row below `row_count`, column within the row.
    pub fn clamp_to(&mut self, rows: &RowIndex) {
        self.row = self.row.min(rows.row_count() - 1);
        self.column = self.column.min(rows.row_len(self.row));
    }
}

/// Byte index of the `unit`-th char of `s` (or `s.len()` when `unit` is at or past the end).
pub(crate) fn byte_offset(s: &str, unit: usize) -> usize {
    s.char_indices().nth(unit).map_or(s.len(), |(b, _)| b)
}

/// Number of units (chars) in `s`.
pub fn unit_len(s: &str) -> usize {
    s.chars().count()
}
