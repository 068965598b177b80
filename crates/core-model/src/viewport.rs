//! Vertical scroll window over the row index.

use std::ops::Range;

/// `scroll_offset` stays within `[0, max(0, row_count - visible_height)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_offset: usize,
    visible_height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Viewport {
    /// `visible_height` is clamped to at least one row.
    pub fn new(visible_height: usize) -> Self {
        Self {
            scroll_offset: 0,
            visible_height: visible_height.max(1),
        }
    }

    pub fn visible_height(&self) -> usize {
        self.visible_height
    }

    pub fn set_visible_height(&mut self, height: usize, row_count: usize) {
        self.visible_height = height.max(1);
        self.clamp(row_count);
    }

    pub fn max_offset(&self, row_count: usize) -> usize {
        row_count.saturating_sub(self.visible_height)
    }

    /// Scroll the minimum amount that brings row `y` into view. Returns
    /// whether the offset changed.
    pub fn follow(&mut self, y: usize, row_count: usize) -> bool {
        let before = self.scroll_offset;
        if y >= self.scroll_offset + self.visible_height {
            self.scroll_offset = y + 1 - self.visible_height;
        } else if y < self.scroll_offset {
            self.scroll_offset = y;
        }
        self.clamp(row_count);
        before != self.scroll_offset
    }

    /// Shift the window by `delta` rows.
    pub fn scroll_by(&mut self, delta: isize, row_count: usize) -> bool {
        let before = self.scroll_offset;
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.clamp(row_count);
        before != self.scroll_offset
    }

    pub fn clamp(&mut self, row_count: usize) {
        self.scroll_offset = self.scroll_offset.min(self.max_offset(row_count));
    }

    /// Row indices currently on screen.
    pub fn visible_rows(&self, row_count: usize) -> Range<usize> {
        let end = (self.scroll_offset + self.visible_height).min(row_count);
        self.scroll_offset.min(end)..end
    }

    pub fn contains(&self, y: usize) -> bool {
        y >= self.scroll_offset && y < self.scroll_offset + self.visible_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_down_and_up() {
        let mut v = Viewport::new(5);
        assert!(!v.follow(4, 10));
        assert!(v.follow(5, 10));
        assert_eq!(v.scroll_offset, 1);
        assert!(v.follow(9, 10));
        assert_eq!(v.scroll_offset, 5);
        assert!(v.follow(3, 10));
        assert_eq!(v.scroll_offset, 3);
    }

    #[test]
    fn scroll_by_is_clamped() {
        let mut v = Viewport::new(4);
        assert!(!v.scroll_by(-1, 10));
        assert!(v.scroll_by(100, 10));
        assert_eq!(v.scroll_offset, 6);
        assert!(v.scroll_by(-2, 10));
        assert_eq!(v.scroll_offset, 4);
    }

    #[test]
    fn short_document_never_scrolls() {
        let mut v = Viewport::new(10);
        assert!(!v.scroll_by(3, 4));
        assert_eq!(v.max_offset(4), 0);
        assert_eq!(v.visible_rows(4), 0..4);
    }

    #[test]
    fn shrinking_document_pulls_offset_back() {
        let mut v = Viewport::new(3);
        v.follow(9, 10);
        assert_eq!(v.scroll_offset, 7);
        v.clamp(5);
        assert_eq!(v.scroll_offset, 2);
        assert_eq!(v.visible_rows(5), 2..5);
    }

    #[test]
    fn zero_height_is_one_row() {
        let mut v = Viewport::new(0);
        assert_eq!(v.visible_height(), 1);
        v.follow(3, 5);
        assert_eq!(v.scroll_offset, 3);
        assert!(v.contains(3));
        assert!(!v.contains(4));
    }
}
