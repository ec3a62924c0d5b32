//! Painter: a clipped view over the shared frame buffer.
//!
//! Every widget draws through a [`Painter`]. Writes outside the clip (or
//! outside the buffer) are silently dropped, so widgets never bounds-check
//! against the surface themselves.

use crate::buffer::{Buffer, Cell, Style};
use crate::layout::Rect;
use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

bitflags! {
    /// Sides of a rectangle.
    ///
    /// Used by [`NeighborLayout`](crate::widget::NeighborLayout) to report
    /// which edges of a widget border a sibling, and by
    /// [`Painter::draw_separators`] to pick the edges to draw.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct Edges: u8 {
        /// Top edge
        const TOP = 0b0001;
        /// Bottom edge
        const BOTTOM = 0b0010;
        /// Left edge
        const LEFT = 0b0100;
        /// Right edge
        const RIGHT = 0b1000;
    }
}

/// The six glyphs of a box outline.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BorderCharset {
    /// Top and bottom edges.
    pub horizontal: char,
    /// Left and right edges.
    pub vertical: char,
    /// Top-left corner.
    pub top_left: char,
    /// Top-right corner.
    pub top_right: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Bottom-right corner.
    pub bottom_right: char,
}

impl BorderCharset {
    /// `┌─┐` light box drawing.
    pub const SINGLE: Self = Self {
        horizontal: '─',
        vertical: '│',
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
    };

    /// `╔═╗` double box drawing.
    pub const DOUBLE: Self = Self {
        horizontal: '═',
        vertical: '║',
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
    };

    /// `╭─╮` rounded corners.
    pub const ROUNDED: Self = Self {
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        ..Self::SINGLE
    };

    /// `+-+` for terminals without box drawing glyphs.
    pub const ASCII: Self = Self {
        horizontal: '-',
        vertical: '|',
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
    };
}

impl Default for BorderCharset {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// A clipped drawing surface over a [`Buffer`].
pub struct Painter<'a> {
    buffer: &'a mut Buffer,
    clip: Rect,
}

impl<'a> Painter<'a> {
    /// Painter covering the whole buffer.
    pub fn new(buffer: &'a mut Buffer) -> Self {
        let clip = buffer.area();
        Self { buffer, clip }
    }

    /// Painter restricted to `clip` (further restricted to the buffer).
    pub fn with_clip(buffer: &'a mut Buffer, clip: Rect) -> Self {
        let clip = clip.intersection(&buffer.area());
        Self { buffer, clip }
    }

    /// The active clip rectangle.
    #[inline]
    pub const fn clip(&self) -> Rect {
        self.clip
    }

    /// Run `f` with a painter narrowed to `rect` within the current clip.
    ///
    /// Containers use this to keep children inside their own bounds.
    pub fn clipped<R>(&mut self, rect: Rect, f: impl FnOnce(&mut Painter<'_>) -> R) -> R {
        let clip = self.clip.intersection(&rect);
        let mut inner = Painter { buffer: &mut *self.buffer, clip };
        f(&mut inner)
    }

    /// Write one cell. No-op outside the clip.
    #[inline]
    pub fn set_cell(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if self.clip.contains(x, y) {
            self.buffer.set(x, y, Cell::styled(ch, style));
        }
    }

    /// Fill `rect` with `ch`.
    pub fn fill(&mut self, rect: Rect, ch: char, style: Style) {
        let area = rect.intersection(&self.clip);
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.buffer.set(x, y, Cell::styled(ch, style));
            }
        }
    }

    /// Draw a single line of text starting at (x, y).
    ///
    /// Wide glyphs take two columns; zero-width characters are skipped.
    /// Returns the number of columns advanced, clipped or not.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, style: Style) -> i32 {
        let mut col = x;
        for ch in text.chars() {
            let width = match ch.width() {
                Some(w) if w > 0 => w as i32,
                _ => continue,
            };
            self.set_cell(col, y, ch, style);
            if width == 2 && self.clip.contains(col + 1, y) {
                self.buffer.set(col + 1, y, Cell::wide_continuation(style));
            }
            col += width;
        }
        col - x
    }

    /// Draw a box outline on the boundary cells of `rect`.
    pub fn draw_border(&mut self, rect: Rect, style: Style, charset: &BorderCharset) {
        if rect.is_empty() {
            return;
        }
        self.draw_separators(rect, style, charset, Edges::all());

        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        self.set_cell(left, top, charset.top_left, style);
        self.set_cell(right, top, charset.top_right, style);
        self.set_cell(left, bottom, charset.bottom_left, style);
        self.set_cell(right, bottom, charset.bottom_right, style);
    }

    /// Draw only the requested edges of `rect`, without corners.
    ///
    /// Adjacent panes use this so that a shared border is drawn once.
    pub fn draw_separators(&mut self, rect: Rect, style: Style, charset: &BorderCharset, edges: Edges) {
        if rect.is_empty() {
            return;
        }
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        for x in rect.x..rect.right() {
            if edges.contains(Edges::TOP) {
                self.set_cell(x, rect.y, charset.horizontal, style);
            }
            if edges.contains(Edges::BOTTOM) {
                self.set_cell(x, bottom, charset.horizontal, style);
            }
        }
        for y in rect.y..rect.bottom() {
            if edges.contains(Edges::LEFT) {
                self.set_cell(rect.x, y, charset.vertical, style);
            }
            if edges.contains(Edges::RIGHT) {
                self.set_cell(right, y, charset.vertical, style);
            }
        }
    }
}
