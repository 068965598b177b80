//! `Document`: the chunked buffer and its row index, mutated together.
//!
//! Every edit applies the buffer change and the matching row patch inside one
//! call and writes the resulting cursor position back through `&mut Position`,
//! so no caller can observe a buffer whose rows are stale.
//!
//! Positions handed in must satisfy the cursor invariant
//! (`row < row_count`, `column <= row_len(row)`); out-of-range requests are
//! contract violations and panic in the buffer layer.

use core_text::{ChunkedBuffer, Position, RowIndex};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Document {
    buffer: ChunkedBuffer,
    rows: RowIndex,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(core_text::DEFAULT_CHUNK_SIZE)
    }
}

impl Document {
    /// Empty document: one empty row.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            buffer: ChunkedBuffer::new(chunk_size),
            rows: RowIndex::new(),
        }
    }

    /// Bulk-load `text` (chunk appends, then a full row scan).
    pub fn from_text(text: &str, chunk_size: usize) -> Self {
        let buffer = ChunkedBuffer::from_text(text, chunk_size);
        let rows = RowIndex::rebuild(&buffer);
        Self { buffer, rows }
    }

    pub fn buffer(&self) -> &ChunkedBuffer {
        &self.buffer
    }

    pub fn rows(&self) -> &RowIndex {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.row_count()
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.rows.row_len(row)
    }

    /// Text of `row` without its newline; empty when out of range.
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|r| self.buffer.get(r.start, r.len))
            .unwrap_or_default()
    }

    /// The whole document.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Insert `text` at `pos`; `pos` moves to just past the inserted text.
    pub fn insert(&mut self, pos: &mut Position, text: &str) {
        debug_assert!(pos.column <= self.rows.row_len(pos.row), "insert column past row end");
        if text.is_empty() {
            return;
        }
        let offset = self.rows.offset_of(pos.row, pos.column);
        self.buffer.insert(text, offset);
        let (row, column) = self.rows.on_insert(pos.row, pos.column, text);
        trace!(
            target: "state.edit",
            op = "insert",
            offset,
            units = core_text::unit_len(text),
            row,
            column,
            "edit"
        );
        *pos = Position::new(row, column);
    }

    /// Insert a single newline at `pos`, splitting its row. `pos` moves to the
    /// start of the new row.
    pub fn insert_newline(&mut self, pos: &mut Position) {
        debug_assert!(pos.column <= self.rows.row_len(pos.row), "newline column past row end");
        let offset = self.rows.offset_of(pos.row, pos.column);
        self.buffer.insert("\n", offset);
        self.rows.split_row(pos.row, pos.column);
        trace!(
            target: "state.edit",
            op = "newline",
            offset,
            row = pos.row,
            column = pos.column,
            "edit"
        );
        *pos = Position::new(pos.row + 1, 0);
    }

    /// Remove the unit before `pos` (backspace). At column 0 this removes the
    /// previous row's newline and merges the rows. Returns `false` (no-op) at
    /// the start of the document.
    pub fn delete_before(&mut self, pos: &mut Position) -> bool {
        if pos.row == 0 && pos.column == 0 {
            return false;
        }
        let offset = self.rows.offset_of(pos.row, pos.column) - 1;
        let removed = self.buffer.get(offset, 1);
        self.buffer.delete(offset, 1);
        let (row, column) = self.rows.on_delete(pos.row, pos.column as isize - 1, &removed);
        trace!(
            target: "state.edit",
            op = "delete_before",
            offset,
            merged = removed == "\n",
            row,
            column,
            "edit"
        );
        *pos = Position::new(row, column);
        true
    }

    /// Remove the unit under `pos`. No-op (returns `false`) at the row end:
    /// this never joins rows.
    pub fn delete_at(&mut self, pos: Position) -> bool {
        if pos.column >= self.rows.row_len(pos.row) {
            return false;
        }
        let offset = self.rows.offset_of(pos.row, pos.column);
        let removed = self.buffer.get(offset, 1);
        self.buffer.delete(offset, 1);
        self.rows.on_delete(pos.row, pos.column as isize, &removed);
        trace!(
            target: "state.edit",
            op = "delete_at",
            offset,
            row = pos.row,
            column = pos.column,
            "edit"
        );
        true
    }

    /// Delete the row at `pos.row`.
    ///
    /// The content is removed one unit at a time with backspaces anchored at
    /// the row end. Then, as a separate final step, one newline goes: the
    /// row's trailing newline when a next row exists (that row moves up into
    /// this index), otherwise the preceding newline (the empty row folds into
    /// the previous one). A lone row is just emptied. `pos` ends at column 0
    /// of the resulting row. Returns `false` when nothing changed.
    pub fn delete_row(&mut self, pos: &mut Position) -> bool {
        let row = pos.row;
        let content = self.rows.row_len(row);
        let mut at = Position::new(row, content);
        for _ in 0..content {
            self.delete_before(&mut at);
        }
        debug_assert_eq!(at, Position::new(row, 0));
        let joined = if row + 1 < self.rows.row_count() {
            let mut next = Position::new(row + 1, 0);
            self.delete_before(&mut next);
            *pos = Position::new(row, 0);
            true
        } else if row > 0 {
            let mut here = Position::new(row, 0);
            self.delete_before(&mut here);
            *pos = Position::new(row - 1, 0);
            true
        } else {
            *pos = Position::origin();
            false
        };
        trace!(target: "state.edit", op = "delete_row", row, content, joined, "edit");
        content > 0 || joined
    }
}
