//! Cursor with remembered ("preferred") column.
//!
//! Horizontal moves set the preferred column; vertical moves read it, so
//! travelling through short rows returns to the intended column once a long
//! enough row is reached again.

use core_state::Document;
use core_text::{
    Position, RowIndex,
    motion::{next_word_column, prev_word_column},
};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub position: Position,
    pub preferred_column: usize,
}

impl Cursor {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            preferred_column: position.column,
        }
    }

    pub fn row(&self) -> usize {
        self.position.row
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Place the cursor explicitly (after an edit). The preferred column
    /// follows the new column.
    pub fn set(&mut self, position: Position) {
        self.position = position;
        self.preferred_column = position.column;
    }

    /// Move horizontally by `dx`, clamped to the row. The preferred column is
    /// only touched when the column actually changes.
    pub fn move_x(&mut self, dx: isize, rows: &RowIndex) -> bool {
        let len = rows.row_len(self.position.row);
        let target = self.position.column.saturating_add_signed(dx).min(len);
        if target == self.position.column {
            return false;
        }
        self.position.column = target;
        self.preferred_column = target;
        trace!(
            target: "model.cursor",
            op = "move_x",
            row = self.position.row,
            column = target,
            "motion"
        );
        true
    }

    /// Move vertically by `dy`, clamped to the document. The column becomes
    /// `min(row_len, preferred_column)`; the preferred column is kept.
    pub fn move_y(&mut self, dy: isize, rows: &RowIndex) -> bool {
        let last = rows.row_count() - 1;
        let row = self.position.row.saturating_add_signed(dy).min(last);
        let column = rows.row_len(row).min(self.preferred_column);
        let moved = row != self.position.row || column != self.position.column;
        self.position = Position::new(row, column);
        trace!(
            target: "model.cursor",
            op = "move_y",
            row,
            column,
            preferred = self.preferred_column,
            "motion"
        );
        moved
    }

    /// Jump to `row` keeping the preferred column (`gg`, `G`).
    pub fn goto_row(&mut self, row: usize, rows: &RowIndex) -> bool {
        let delta = row as isize - self.position.row as isize;
        self.move_y(delta, rows)
    }

    /// `0`
    pub fn row_start(&mut self, rows: &RowIndex) -> bool {
        self.move_x(-(self.position.column as isize), rows)
    }

    /// `$`
    pub fn row_end(&mut self, rows: &RowIndex) -> bool {
        let len = rows.row_len(self.position.row);
        self.move_x(len as isize - self.position.column as isize, rows)
    }

    /// Move past the next space on the row, or to the row end. At the row end,
    /// step to the start of the next row.
    pub fn word_forward(&mut self, doc: &Document) -> bool {
        let Position { row, column } = self.position;
        let len = doc.row_len(row);
        let target = if column >= len {
            if row + 1 >= doc.row_count() {
                return false;
            }
            Position::new(row + 1, 0)
        } else {
            Position::new(row, next_word_column(&doc.row_text(row), column))
        };
        self.jump(target, "word_forward")
    }

    /// Move just past the previous space on the row, or to the row start. At
    /// column 0, step to the end of the previous row.
    pub fn word_backward(&mut self, doc: &Document) -> bool {
        let Position { row, column } = self.position;
        let target = if column == 0 {
            if row == 0 {
                return false;
            }
            Position::new(row - 1, doc.row_len(row - 1))
        } else {
            Position::new(row, prev_word_column(&doc.row_text(row), column))
        };
        self.jump(target, "word_backward")
    }

    fn jump(&mut self, target: Position, op: &'static str) -> bool {
        if target == self.position {
            return false;
        }
        self.set(target);
        trace!(target: "model.cursor", op, row = target.row, column = target.column, "motion");
        true
    }

    /// Pull the cursor back inside `rows` after a structural change.
    pub fn clamp(&mut self, rows: &RowIndex) {
        self.position.clamp_to(rows);
    }

    /// `0 <= row < row_count` and `0 <= column <= row_len(row)`.
    pub fn is_valid(&self, rows: &RowIndex) -> bool {
        self.position.row < rows.row_count()
            && self.position.column <= rows.row_len(self.position.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::from_text(text, 100)
    }

    #[test]
    fn move_x_clamps_and_keeps_preferred_on_noop() {
        let d = doc("abc");
        let mut c = Cursor::at(Position::new(0, 2));
        assert!(c.move_x(5, d.rows()));
        assert_eq!(c.column(), 3);
        assert_eq!(c.preferred_column, 3);
        c.preferred_column = 7;
        assert!(!c.move_x(1, d.rows()));
        assert_eq!(c.preferred_column, 7, "no-op move keeps remembered column");
        assert!(c.move_x(-10, d.rows()));
        assert_eq!(c.column(), 0);
        assert_eq!(c.preferred_column, 0);
    }

    #[test]
    fn move_y_remembers_column_across_short_rows() {
        let d = doc("abcdefgh\nab\n\nabcdefghij");
        let mut c = Cursor::at(Position::new(0, 6));
        c.move_y(1, d.rows());
        assert_eq!(c.position, Position::new(1, 2));
        c.move_y(1, d.rows());
        assert_eq!(c.position, Position::new(2, 0));
        c.move_y(1, d.rows());
        assert_eq!(c.position, Position::new(3, 6));
        assert_eq!(c.preferred_column, 6);
    }

    #[test]
    fn move_y_clamps_to_document() {
        let d = doc("a\nb");
        let mut c = Cursor::default();
        assert!(!c.move_y(-3, d.rows()));
        assert!(c.move_y(10, d.rows()));
        assert_eq!(c.row(), 1);
    }

    #[test]
    fn row_start_and_end() {
        let d = doc("hello");
        let mut c = Cursor::at(Position::new(0, 2));
        assert!(c.row_end(d.rows()));
        assert_eq!(c.column(), 5);
        assert!(c.row_start(d.rows()));
        assert_eq!(c.column(), 0);
        assert!(!c.row_start(d.rows()));
    }

    #[test]
    fn word_forward_then_next_row() {
        let d = doc("hello world foo\nbar");
        let mut c = Cursor::default();
        c.word_forward(&d);
        assert_eq!(c.column(), 6);
        c.word_forward(&d);
        assert_eq!(c.column(), 12);
        c.word_forward(&d);
        assert_eq!(c.column(), 15);
        c.word_forward(&d);
        assert_eq!(c.position, Position::new(1, 0));
        c.word_forward(&d);
        assert_eq!(c.position, Position::new(1, 3));
        assert!(!c.word_forward(&d));
    }

    #[test]
    fn word_backward_then_previous_row() {
        let d = doc("ab cd\nef gh");
        let mut c = Cursor::at(Position::new(1, 5));
        c.word_backward(&d);
        assert_eq!(c.position, Position::new(1, 3));
        c.word_backward(&d);
        assert_eq!(c.position, Position::new(1, 0));
        c.word_backward(&d);
        assert_eq!(c.position, Position::new(0, 5));
        assert_eq!(c.preferred_column, 5);
        c.word_backward(&d);
        c.word_backward(&d);
        assert_eq!(c.position, Position::origin());
        assert!(!c.word_backward(&d));
    }

    #[test]
    fn clamp_after_shrink() {
        let d = doc("ab");
        let mut c = Cursor::at(Position::new(3, 9));
        assert!(!c.is_valid(d.rows()));
        c.clamp(d.rows());
        assert_eq!(c.position, Position::new(0, 2));
        assert!(c.is_valid(d.rows()));
    }
}
