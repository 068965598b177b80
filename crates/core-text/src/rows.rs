//! Row (logical line) index derived from a [`ChunkedBuffer`].
//!
//! Rows partition `[0, buffer.len())`: row `i + 1` starts one unit after row
//! `i` ends (the newline), so `sum(len) + row_count - 1 == buffer.len()`.
//! There is always at least one row; an empty document has a single empty row
//! and a document ending in a newline has a trailing empty row.
//!
//! The index is rebuilt from scratch only on load. Edits patch it through
//! [`RowIndex::on_insert`] / [`RowIndex::on_delete`], which the caller must
//! invoke with the same text it applied to the buffer.

use crate::{ChunkedBuffer, unit_len};
use tracing::trace;

/// Span of one row inside the buffer. `len` excludes the newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Row {
    pub start: usize,
    pub len: usize,
}

impl Row {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Offset one past the last unit of the row (where its newline sits, if any).
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIndex {
    rows: Vec<Row>,
}

impl Default for RowIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl RowIndex {
    /// Index for an empty document: one empty row.
    pub fn new() -> Self {
        Self {
            rows: vec![Row::default()],
        }
    }

    /// Full scan of `buffer`.
    pub fn rebuild(buffer: &ChunkedBuffer) -> Self {
        let mut rows = Vec::new();
        let mut start = 0;
        for (offset, ch) in buffer.chars().enumerate() {
            if ch == '\n' {
                rows.push(Row::new(start, offset - start));
                start = offset + 1;
            }
        }
        rows.push(Row::new(start, buffer.len() - start));
        trace!(target: "text.rows", rows = rows.len(), "rebuild");
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize) -> Option<Row> {
        self.rows.get(row).copied()
    }

    /// Row at `row`. Panics when out of range.
    pub fn row(&self, row: usize) -> Row {
        self.rows[row]
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Length of `row`, zero when out of range.
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |r| r.len)
    }

    /// Absolute buffer offset of `(row, column)`.
    pub fn offset_of(&self, row: usize, column: usize) -> usize {
        self.rows[row].start + column
    }

    /// Row containing `offset`. Offsets on a newline belong to the row it terminates.
    pub fn row_at_offset(&self, offset: usize) -> usize {
        match self.rows.binary_search_by(|r| r.start.cmp(&offset)) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Patch the index after `text` was inserted at `(row, column)`.
    ///
    /// Returns the `(row, column)` just past the inserted text.
    pub fn on_insert(&mut self, row: usize, column: usize, text: &str) -> (usize, usize) {
        let mut row = row;
        let mut column = column;
        for (i, run) in text.split('\n').enumerate() {
            if i > 0 {
                self.split_row(row, column);
                row += 1;
                column = 0;
            }
            let units = unit_len(run);
            if units > 0 {
                self.rows[row].len += units;
                self.shift_after(row, units as isize);
                column += units;
            }
        }
        trace!(target: "text.rows", row, column, rows = self.rows.len(), "on_insert");
        (row, column)
    }

    /// Newline inserted at `(row, column)`: truncate the row there and open a
    /// new row right after the newline holding the remainder.
    pub fn split_row(&mut self, row: usize, column: usize) {
        let current = self.rows[row];
        debug_assert!(column <= current.len, "split column past row end");
        self.rows[row].len = column;
        let next = Row::new(current.start + column + 1, current.len - column);
        self.rows.insert(row + 1, next);
        self.shift_after(row + 1, 1);
    }

    /// Patch the index after `removed` was deleted starting at `(row, column)`.
    ///
    /// `column` may be negative: a deletion starting before the row (the
    /// newline separating it from the previous row) merges the rows, the
    /// previous row absorbing the current one. Returns the normalized
    /// `(row, column)` where the deletion started.
    pub fn on_delete(&mut self, row: usize, column: isize, removed: &str) -> (usize, usize) {
        let mut row = row;
        let mut column = column;
        while column < 0 {
            assert!(row > 0, "delete starts before the document");
            row -= 1;
            column += self.rows[row].len as isize + 1;
        }
        let column = column as usize;
        let removed_len = unit_len(removed);
        let newlines = removed.matches('\n').count();
        if newlines == 0 {
            self.rows[row].len -= removed_len;
        } else {
            let last_run = removed.rsplit('\n').next().map_or(0, unit_len);
            let end_row = row + newlines;
            let tail = self.rows[end_row].len - last_run;
            self.rows[row].len = column + tail;
            self.rows.drain(row + 1..=end_row);
            trace!(target: "text.rows", row, merged = newlines, "merge_rows");
        }
        self.shift_after(row, -(removed_len as isize));
        (row, column)
    }

    fn shift_after(&mut self, row: usize, delta: isize) {
        for r in &mut self.rows[row + 1..] {
            r.start = r.start.saturating_add_signed(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(buffer: &ChunkedBuffer, rows: &RowIndex) -> Vec<String> {
        rows.rows()
            .iter()
            .map(|r| buffer.get(r.start, r.len))
            .collect()
    }

    #[test]
    fn rebuild_empty_has_one_row() {
        let rows = RowIndex::rebuild(&ChunkedBuffer::new(10));
        assert_eq!(rows.rows(), &[Row::new(0, 0)]);
    }

    #[test]
    fn rebuild_trailing_newline_has_empty_last_row() {
        let b = ChunkedBuffer::from_text("ab\ncd\n", 2);
        let rows = RowIndex::rebuild(&b);
        assert_eq!(
            rows.rows(),
            &[Row::new(0, 2), Row::new(3, 2), Row::new(6, 0)]
        );
    }

    #[test]
    fn insert_without_newline_grows_and_shifts() {
        let mut b = ChunkedBuffer::from_text("ab\ncd", 100);
        let mut rows = RowIndex::rebuild(&b);
        b.insert("XY", 1);
        let end = rows.on_insert(0, 1, "XY");
        assert_eq!(end, (0, 3));
        assert_eq!(texts(&b, &rows), vec!["aXYb", "cd"]);
        assert_eq!(rows, RowIndex::rebuild(&b));
    }

    #[test]
    fn insert_with_newline_splits_row() {
        let mut b = ChunkedBuffer::from_text("helloworld", 100);
        let mut rows = RowIndex::rebuild(&b);
        b.insert("a\nb", 5);
        let end = rows.on_insert(0, 5, "a\nb");
        assert_eq!(end, (1, 1));
        assert_eq!(texts(&b, &rows), vec!["helloa", "bworld"]);
        assert_eq!(rows, RowIndex::rebuild(&b));
    }

    #[test]
    fn insert_multiple_newlines() {
        let mut b = ChunkedBuffer::from_text("xy\nz", 3);
        let mut rows = RowIndex::rebuild(&b);
        b.insert("1\n\n2\n", 1);
        let end = rows.on_insert(0, 1, "1\n\n2\n");
        assert_eq!(end, (3, 0));
        assert_eq!(texts(&b, &rows), vec!["x1", "", "2", "y", "z"]);
        assert_eq!(rows, RowIndex::rebuild(&b));
    }

    #[test]
    fn delete_within_row_shrinks() {
        let mut b = ChunkedBuffer::from_text("abc\ndef", 100);
        let mut rows = RowIndex::rebuild(&b);
        let removed = b.get(1, 1);
        b.delete(1, 1);
        assert_eq!(rows.on_delete(0, 1, &removed), (0, 1));
        assert_eq!(texts(&b, &rows), vec!["ac", "def"]);
        assert_eq!(rows, RowIndex::rebuild(&b));
    }

    #[test]
    fn delete_negative_column_merges_with_previous() {
        let mut b = ChunkedBuffer::from_text("abc\ndef", 100);
        let mut rows = RowIndex::rebuild(&b);
        b.delete(3, 1);
        assert_eq!(rows.on_delete(1, -1, "\n"), (0, 3));
        assert_eq!(texts(&b, &rows), vec!["abcdef"]);
        assert_eq!(rows.row(0), Row::new(0, 6));
    }

    #[test]
    fn delete_span_across_rows() {
        let mut b = ChunkedBuffer::from_text("ab\ncd\nef\ngh", 2);
        let mut rows = RowIndex::rebuild(&b);
        let removed = b.get(1, 6);
        assert_eq!(removed, "b\ncd\ne");
        b.delete(1, 6);
        rows.on_delete(0, 1, &removed);
        assert_eq!(texts(&b, &rows), vec!["af", "gh"]);
        assert_eq!(rows, RowIndex::rebuild(&b));
    }

    #[test]
    fn row_at_offset_maps_newlines_to_their_row() {
        let b = ChunkedBuffer::from_text("ab\ncd\n", 100);
        let rows = RowIndex::rebuild(&b);
        assert_eq!(rows.row_at_offset(0), 0);
        assert_eq!(rows.row_at_offset(2), 0);
        assert_eq!(rows.row_at_offset(3), 1);
        assert_eq!(rows.row_at_offset(6), 2);
    }
}
