//! Buffer: the frame buffer, a grid of cells sized to the surface.
//!
//! Cells are stored contiguously in row-major order. A zero-sized buffer
//! is valid and simply holds no cells.

use super::cell::Cell;
use crate::layout::Rect;

/// A grid of cells representing the composed screen.
///
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Buffer {
    /// Create a new buffer with the given dimensions, filled with empty cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Cell::EMPTY)
    }

    /// Create a new buffer with every cell set to `cell`.
    pub fn filled(width: u16, height: u16, cell: Cell) -> Self {
        let size = (width as usize) * (height as usize);
        Self { cells: vec![cell; size], width, height }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the buffer holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width as usize && y < self.height as usize)
            .then(|| y * (self.width as usize) + x)
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Fill the part of `rect` that lies inside the buffer.
    pub fn fill_rect(&mut self, rect: Rect, cell: Cell) {
        let Some(area) = rect.clip_to(self.width, self.height) else {
            return;
        };
        let width = self.width as usize;
        for row in area.y..area.bottom() {
            // clip_to guarantees non-negative coordinates
            let start = row as usize * width + area.x as usize;
            self.cells[start..start + area.width as usize].fill(cell);
        }
    }

    /// Clear the entire buffer (fill with empty cells).
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// The symbols of one row as a string, continuation cells skipped.
    ///
    /// Handy for assertions and debugging output.
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(y as usize)
            .map(|row| {
                row.iter()
                    .filter(|c| !c.is_wide_continuation())
                    .map(Cell::symbol)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_new() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.len(), 80 * 24);
    }

    #[test]
    fn test_buffer_zero_size_is_valid() {
        let buffer = Buffer::new(0, 24);
        assert!(buffer.is_empty());
        assert!(buffer.get(0, 0).is_none());
        assert_eq!(buffer.row_text(0), "");
    }

    #[test]
    fn test_buffer_get_set() {
        let mut buffer = Buffer::new(80, 24);
        assert!(buffer.set(5, 10, Cell::new('X')));
        assert_eq!(buffer.get(5, 10).map(Cell::symbol), Some('X'));
    }

    #[test]
    fn test_buffer_bounds() {
        let mut buffer = Buffer::new(80, 24);
        assert!(buffer.get(79, 23).is_some());
        assert!(buffer.get(80, 23).is_none());
        assert!(buffer.get(-1, 0).is_none());
        assert!(!buffer.set(0, -1, Cell::new('X')));
    }

    #[test]
    fn test_buffer_fill_rect_clips() {
        let mut buffer = Buffer::new(10, 4);
        buffer.fill_rect(Rect::new(-2, 2, 5, 9), Cell::new('#'));
        assert_eq!(buffer.row_text(1), "          ");
        assert_eq!(buffer.row_text(2), "###       ");
        assert_eq!(buffer.row_text(3), "###       ");
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = Buffer::new(8, 2);
        buffer.set(5, 1, Cell::new('X'));
        buffer.clear();
        assert_eq!(buffer.get(5, 1), Some(&Cell::EMPTY));
    }
}
