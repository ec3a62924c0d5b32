//! Rect: the rectangle primitive behind layout, clipping and damage tracking.
//!
//! Coordinates are signed so that widgets may be positioned partially
//! off-surface; a rectangle with a non-positive width or height is *empty*
//! and takes no part in any region operation.

/// A rectangle defined by position and size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate (column) of the top-left corner.
    pub x: i32,
    /// Y coordinate (row) of the top-left corner.
    pub y: i32,
    /// Width in columns.
    pub width: i32,
    /// Height in rows.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle covering a whole surface of the given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Get the area (number of cells), zero when empty.
    #[inline]
    pub const fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.width as u64) * (self.height as u64)
        }
    }

    /// Check if the rectangle is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Get the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle shares at least one cell with another.
    ///
    /// Empty rectangles never overlap anything.
    #[inline]
    pub const fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Check if this rectangle overlaps another, shares an edge with it,
    /// or meets it at a corner.
    #[inline]
    pub const fn touches_or_overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Bounding box of both rectangles.
    ///
    /// An empty operand contributes nothing.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    /// The cells shared by both rectangles, or [`Rect::ZERO`] if none.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        if !self.overlaps(other) {
            return Self::ZERO;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Self::new(x, y, self.right().min(other.right()) - x, self.bottom().min(other.bottom()) - y)
    }

    /// Clip to a surface of the given size anchored at the origin.
    ///
    /// Negative origins trim the width and height accordingly. Returns
    /// `None` when nothing is left.
    pub fn clip_to(&self, width: u16, height: u16) -> Option<Self> {
        let clipped = self.intersection(&Self::from_size(width, height));
        (!clipped.is_empty()).then_some(clipped)
    }

    /// Same size, new origin.
    #[inline]
    #[must_use]
    pub const fn with_position(&self, x: i32, y: i32) -> Self {
        Self::new(x, y, self.width, self.height)
    }

    /// Same origin, new size. Negative dimensions clamp to zero.
    #[inline]
    #[must_use]
    pub fn with_size(&self, width: i32, height: i32) -> Self {
        Self::new(self.x, self.y, width.max(0), height.max(0))
    }

    /// Shrink the rectangle by a margin on all sides.
    #[must_use]
    pub fn shrink(&self, margin: i32) -> Self {
        let m2 = margin * 2;
        if self.width <= m2 || self.height <= m2 {
            return Self::ZERO;
        }
        Self::new(self.x + margin, self.y + margin, self.width - m2, self.height - m2)
    }

    /// Split horizontally at a given column offset.
    pub fn split_horizontal(&self, at: i32) -> (Self, Self) {
        let at = at.clamp(0, self.width.max(0));
        (
            Self::new(self.x, self.y, at, self.height),
            Self::new(self.x + at, self.y, self.width - at, self.height),
        )
    }

    /// Split vertically at a given row offset.
    pub fn split_vertical(&self, at: i32) -> (Self, Self) {
        let at = at.clamp(0, self.height.max(0));
        (
            Self::new(self.x, self.y, self.width, at),
            Self::new(self.x, self.y + at, self.width, self.height - at),
        )
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Merge damage rectangles into a covering set.
///
/// Any two rectangles that touch or overlap are replaced by their union and
/// the pair scan restarts, until no pair merges. Empty rectangles are
/// dropped. The result covers every input cell but is not guaranteed to be
/// the minimal decomposition.
pub fn merge_rects(rects: impl IntoIterator<Item = Rect>) -> Vec<Rect> {
    let mut merged: Vec<Rect> = rects.into_iter().filter(|r| !r.is_empty()).collect();

    'scan: loop {
        for i in 0..merged.len() {
            for j in (i + 1)..merged.len() {
                if merged[i].touches_or_overlaps(&merged[j]) {
                    let other = merged.swap_remove(j);
                    merged[i] = merged[i].union(&other);
                    continue 'scan;
                }
            }
        }
        return merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 4));
        assert!(!r.contains(6, 4));
        assert!(!r.contains(2, 5));
        assert!(!Rect::new(0, 0, 0, 5).contains(0, 0));
    }

    #[test]
    fn test_rect_overlaps_is_strict() {
        let a = Rect::new(0, 0, 4, 4);
        assert!(a.overlaps(&Rect::new(3, 3, 2, 2)));
        // Shares an edge only
        assert!(!a.overlaps(&Rect::new(4, 0, 2, 2)));
        // Empty never overlaps
        assert!(!a.overlaps(&Rect::new(1, 1, 0, 2)));
        assert!(!a.overlaps(&Rect::new(1, 1, -3, 2)));
    }

    #[test]
    fn test_rect_touches_edge_and_corner() {
        let a = Rect::new(0, 0, 4, 4);
        assert!(a.touches_or_overlaps(&Rect::new(4, 1, 2, 2)));
        assert!(a.touches_or_overlaps(&Rect::new(4, 4, 1, 1)));
        assert!(!a.touches_or_overlaps(&Rect::new(5, 0, 1, 1)));
        assert!(!a.touches_or_overlaps(&Rect::ZERO));
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 3, 1, 1);
        assert_eq!(a.union(&b), Rect::new(0, 0, 6, 4));
        assert_eq!(a.union(&Rect::ZERO), a);
        assert_eq!(Rect::new(9, 9, -1, 3).union(&b), b);
    }

    #[test]
    fn test_rect_clip_negative_origin() {
        let r = Rect::new(-2, -1, 5, 3);
        assert_eq!(r.clip_to(10, 10), Some(Rect::new(0, 0, 3, 2)));
        assert_eq!(Rect::new(-5, 0, 5, 3).clip_to(10, 10), None);
        assert_eq!(Rect::new(8, 8, 5, 5).clip_to(10, 10), Some(Rect::new(8, 8, 2, 2)));
    }

    #[test]
    fn test_rect_with_size_clamps() {
        let r = Rect::new(1, 1, 3, 3).with_size(-4, 2);
        assert_eq!(r, Rect::new(1, 1, 0, 2));
        assert!(r.is_empty());
    }

    #[test]
    fn test_merge_touching_pair_yields_union() {
        let a = Rect::new(0, 0, 3, 3);
        let b = Rect::new(3, 0, 2, 5);
        assert_eq!(merge_rects([a, b]), vec![a.union(&b)]);
        assert_eq!(merge_rects([b, a]), vec![a.union(&b)]);
    }

    #[test]
    fn test_merge_corner_contact() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(2, 2, 2, 2);
        assert_eq!(merge_rects([a, b]), vec![Rect::new(0, 0, 4, 4)]);
    }

    #[test]
    fn test_merge_disjoint_pair_unchanged() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 5, 2, 2);
        let merged = merge_rects([a, b]);
        assert_eq!(merged.len(), 2);
        assert!(merged.contains(&a));
        assert!(merged.contains(&b));
    }

    #[test]
    fn test_merge_chain_collapses() {
        // a and c are disjoint, but b bridges them once merged with a.
        let a = Rect::new(0, 0, 2, 1);
        let b = Rect::new(2, 0, 2, 1);
        let c = Rect::new(5, 0, 1, 1);
        let d = Rect::new(4, 1, 1, 1);
        let merged = merge_rects([c, a, d, b]);
        assert_eq!(merged, vec![Rect::new(0, 0, 6, 2)]);
    }

    #[test]
    fn test_merge_drops_empty() {
        let merged = merge_rects([Rect::new(0, 0, 0, 4), Rect::new(1, 1, 2, -1)]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_covers_every_input() {
        let input = [
            Rect::new(0, 0, 3, 1),
            Rect::new(10, 10, 1, 1),
            Rect::new(2, 1, 2, 2),
            Rect::new(20, 0, 4, 4),
            Rect::new(11, 11, 3, 1),
        ];
        let merged = merge_rects(input);
        for r in input {
            for y in r.y..r.bottom() {
                for x in r.x..r.right() {
                    assert!(merged.iter().any(|m| m.contains(x, y)), "gap at ({x}, {y})");
                }
            }
        }
        assert_eq!(merged.len(), 3);
    }
}
