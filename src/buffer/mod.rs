//! Buffer module: the cell grid that the compositor draws into.
//!
//! This module contains:
//! - [`Cell`]: one character plus its [`Style`]
//! - [`Buffer`]: the frame buffer, a grid of cells sized to the surface
//! - [`Rgb`] and [`Modifiers`]: the parts of a style

mod cell;
#[allow(clippy::module_inception)]
mod buffer;

pub use buffer::Buffer;
pub use cell::{Cell, CellFlags, Modifiers, Rgb, Style};
