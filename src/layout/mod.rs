//! Layout module: rectangle algebra for widget bounds, clipping and damage.
//!
//! All region operations treat a rectangle with non-positive width or height
//! as empty and skip it.

mod rect;

pub use rect::{merge_rects, Rect};
