//! Presentation: getting composed frames onto a real terminal.
//!
//! - [`output`]: byte buffer of ANSI sequences, flushed in one write
//! - [`diff`]: minimal output between two frames within damaged regions
//! - [`driver`]: [`Presenter`] and the [`RedrawDriver`] thread

pub mod diff;
pub mod driver;
pub mod output;

pub use diff::{render_diff, render_full, DiffState, DiffStats};
pub use driver::{DriverConfig, Presenter, RedrawDriver};
pub use output::OutputBuffer;
