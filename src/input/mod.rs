//! Input: event types and the crossterm input actor.
//!
//! The compositor only consumes [`KeyEvent`] and [`MouseEvent`]; the
//! [`InputActor`] is one way of producing them from a real terminal.

mod actor;
mod events;

pub use actor::{EventConverter, InputActor, InputConfig};
pub use events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButtons, MouseEvent};
