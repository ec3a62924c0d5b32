//! Reference widgets.
//!
//! Small concrete widgets built on the [`crate::widget`] contract:
//!
//! - [`TextInput`]: single-line text entry
//! - [`StatusBar`]: bottom bar showing the focused widget's key hints
//! - [`Panel`]: bordered container with its own tab order

mod panel;
mod status_bar;
mod text_input;

pub use panel::{Panel, PanelLayout};
pub use status_bar::{StatusBar, StatusBarConfig};
pub use text_input::{TextInput, TextInputConfig};
